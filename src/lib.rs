//! Forearm-pass (volleyball "bump") pose scoring engine
//!
//! Turns a sequence of normalized landmark frames into per-frame biomechanical
//! scores, whole-sequence temporal metrics and a combined grade.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::{AppConfig, ScoringConfig, ScoringProfile};
pub use errors::{ConfigError, FrameError};
pub use services::PoseAnalysisService;

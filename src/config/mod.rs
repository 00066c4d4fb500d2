pub mod app;
pub mod scoring;

pub use app::AppConfig;
pub use scoring::{
    AdaptiveConfig, CombinationWeights, GradeThresholds, LevelThresholds, ScoringConfig,
    ScoringProfile, SequenceWeights, StrictTemplate,
};

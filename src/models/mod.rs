// Data models for pose scoring

pub mod analysis;
pub mod frame_score;
pub mod landmark;
pub mod sequence;
pub mod standards;

pub use analysis::*;
pub use frame_score::*;
pub use landmark::*;
pub use sequence::*;
pub use standards::*;

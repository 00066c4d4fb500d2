// Scoring engine services

pub mod adaptive_standards_service;
pub mod frame_scoring_service;
pub mod keypoint_processor;
pub mod pose_analysis_service;
pub mod score_aggregation_service;
pub mod scoring_curve;
pub mod sequence_analysis_service;

pub use adaptive_standards_service::AdaptiveStandardsService;
pub use frame_scoring_service::{scorer_for, ScoringStrategy, StrictScorer, TolerantScorer};
pub use pose_analysis_service::PoseAnalysisService;
pub use score_aggregation_service::ScoreAggregationService;
pub use scoring_curve::soft_range_score;
pub use sequence_analysis_service::SequenceAnalysisService;

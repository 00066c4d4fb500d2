use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{ScoringConfig, ScoringProfile};
use crate::errors::ConfigError;
use crate::models::{
    AggregationMode, CombinedResult, FrameAnalysis, FrameScore, LandmarkFrame, ScoreCombination,
    SequenceMetrics,
};
use crate::services::adaptive_standards_service::AdaptiveStandardsService;
use crate::services::frame_scoring_service::{scorer_for, ScoringStrategy};
use crate::services::score_aggregation_service::ScoreAggregationService;
use crate::services::sequence_analysis_service::SequenceAnalysisService;

/// Entry point of the scoring engine
///
/// Cheap to clone; every analysis call owns its frames and shares nothing
/// mutable with other calls.
#[derive(Clone)]
pub struct PoseAnalysisService {
    config: Arc<ScoringConfig>,
    scorer: Arc<dyn ScoringStrategy>,
    standards: AdaptiveStandardsService,
    sequence: SequenceAnalysisService,
    aggregator: ScoreAggregationService,
}

impl PoseAnalysisService {
    /// Create a new PoseAnalysisService, rejecting an invalid configuration
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            scorer: scorer_for(&config),
            standards: AdaptiveStandardsService::new(config.standards, config.adaptive),
            sequence: SequenceAnalysisService::new(config.sequence),
            aggregator: ScoreAggregationService::new(&config),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn profile(&self) -> ScoringProfile {
        self.scorer.profile()
    }

    pub fn aggregator(&self) -> &ScoreAggregationService {
        &self.aggregator
    }

    /// Score one frame in isolation
    pub fn analyze_frame(&self, frame: Option<&LandmarkFrame>) -> FrameAnalysis {
        let frame_score = self.scorer.score_frame(frame);
        let score = f64::from(frame_score.total);

        let (body_scale, standards) = match frame {
            Some(landmarks) => {
                let (scale, standards) = self.standards.standards_for_frame(landmarks);
                let standards = match self.profile() {
                    ScoringProfile::Tolerant => Some(standards),
                    ScoringProfile::Strict => None,
                };
                (Some(scale), standards)
            }
            None => (None, None),
        };

        FrameAnalysis {
            body_scale,
            standards,
            breakdown: frame_score.breakdown(&self.scorer.maxima()),
            grade: self.aggregator.grade(score).into(),
            level: self.aggregator.level(score),
            frame_score,
        }
    }

    /// Score every frame, in order
    pub fn score_frames(&self, frames: &[Option<LandmarkFrame>]) -> Vec<FrameScore> {
        frames
            .iter()
            .map(|frame| self.scorer.score_frame(frame.as_ref()))
            .collect()
    }

    /// Temporal metrics of the sequence
    pub fn sequence_metrics(&self, frames: &[Option<LandmarkFrame>]) -> SequenceMetrics {
        self.sequence.analyze(frames)
    }

    /// Best per-frame total blended with smoothness and completeness
    pub fn analyze_sequence(&self, frames: &[Option<LandmarkFrame>]) -> CombinedResult {
        self.analyze_with_mode(frames, AggregationMode::Sequence)
    }

    /// Most representative frame blended with the sequence aggregate
    pub fn analyze_representative(&self, frames: &[Option<LandmarkFrame>]) -> CombinedResult {
        self.analyze_with_mode(frames, AggregationMode::Representative)
    }

    pub fn analyze_with_mode(
        &self,
        frames: &[Option<LandmarkFrame>],
        mode: AggregationMode,
    ) -> CombinedResult {
        debug!("Analyzing {} frames in {:?} mode", frames.len(), mode);
        let frame_scores = self.score_frames(frames);
        let metrics = self.sequence.analyze(frames);
        self.finish(mode, frames, frame_scores, metrics)
    }

    /// Run the per-frame pass and the sequence pass as two blocking tasks
    ///
    /// Both passes read the same frames and neither depends on the other;
    /// aggregation waits for both.
    pub async fn analyze_sequence_concurrent(
        &self,
        frames: Vec<Option<LandmarkFrame>>,
        mode: AggregationMode,
    ) -> Result<CombinedResult> {
        let frames = Arc::new(frames);

        let scoring = {
            let service = self.clone();
            let frames = Arc::clone(&frames);
            tokio::task::spawn_blocking(move || service.score_frames(&frames))
        };
        let temporal = {
            let sequence = self.sequence.clone();
            let frames = Arc::clone(&frames);
            tokio::task::spawn_blocking(move || sequence.analyze(&frames))
        };

        let (frame_scores, metrics) = tokio::try_join!(scoring, temporal)
            .context("Sequence analysis task failed")?;

        Ok(self.finish(mode, &frames, frame_scores, metrics))
    }

    /// Grade a frame score and sequence aggregate computed elsewhere
    pub fn combine_scores(&self, frame_score: f64, sequence_score: f64) -> ScoreCombination {
        self.aggregator.combine(frame_score, sequence_score)
    }

    fn finish(
        &self,
        mode: AggregationMode,
        frames: &[Option<LandmarkFrame>],
        frame_scores: Vec<FrameScore>,
        metrics: SequenceMetrics,
    ) -> CombinedResult {
        let summary = self.sequence.summarize(&metrics, frames);
        let result = self.aggregator.aggregate(
            mode,
            frame_scores,
            metrics,
            summary,
            &self.scorer.maxima(),
        );
        info!(
            "Analyzed {} frames ({} valid): {} / {}",
            result.total_frames, result.valid_frames, result.combined_score, result.grade.grade
        );
        result
    }
}

use tracing::{debug, info};

use crate::config::{CombinationWeights, GradeThresholds, LevelThresholds, ScoringConfig};
use crate::models::{
    AggregationMode, CombinedResult, Feedback, FrameScore, Grade, GradeInfo, Level, LevelInfo,
    ScoreCombination, SequenceMetrics, SequenceSummary, SubScoreMaxima,
};

/// Service combining frame and sequence scores into a grade
#[derive(Debug, Clone)]
pub struct ScoreAggregationService {
    grades: GradeThresholds,
    levels: LevelThresholds,
    weights: CombinationWeights,
}

/// Clamp to [0, 100] and truncate
fn to_score(value: f64) -> u32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

impl ScoreAggregationService {
    /// Create a new ScoreAggregationService
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            grades: config.grade_thresholds(),
            levels: config.levels,
            weights: config.combination,
        }
    }

    /// Letter grade for a score
    pub fn grade(&self, score: f64) -> Grade {
        if score >= self.grades.s {
            Grade::S
        } else if score >= self.grades.a {
            Grade::A
        } else if score >= self.grades.b {
            Grade::B
        } else if score >= self.grades.c {
            Grade::C
        } else {
            Grade::D
        }
    }

    /// Training level reached by a score
    pub fn level(&self, score: f64) -> LevelInfo {
        let (level, passed, next_level, message) = if score >= self.levels.advanced {
            (
                Level::Advanced,
                true,
                None,
                "Congratulations, you have reached a professional level",
            )
        } else if score >= self.levels.intermediate {
            (
                Level::Intermediate,
                true,
                Some(Level::Advanced),
                "Great work, on to the advanced level",
            )
        } else if score >= self.levels.beginner {
            (
                Level::Beginner,
                true,
                Some(Level::Intermediate),
                "Beginner level passed, keep going",
            )
        } else {
            (
                Level::Beginner,
                false,
                Some(Level::Beginner),
                "Keep practicing the basic movement",
            )
        };

        LevelInfo {
            level,
            passed,
            next_level,
            message: message.to_string(),
        }
    }

    /// One-line verdict placed ahead of the detailed feedback
    pub fn overall_message(&self, score: f64) -> Feedback {
        if score >= 85.0 {
            Feedback::info("Excellent! Your technique is standard, keep it up")
        } else if score >= 60.0 {
            Feedback::info("Good! There is still room to improve")
        } else {
            Feedback::info("Needs work, keep practicing")
        }
    }

    /// Best per-frame total blended with smoothness and completeness, all on 0-100
    pub fn sequence_native_score(&self, best_frame_total: u32, metrics: &SequenceMetrics) -> u32 {
        to_score(
            f64::from(best_frame_total) * self.weights.best_frame
                + metrics.smoothness * self.weights.smoothness
                + metrics.completeness * self.weights.completeness,
        )
    }

    /// Frame score blended with the simplified sequence aggregate
    pub fn representative_score(&self, frame_score: f64, sequence_score: f64) -> u32 {
        to_score(frame_score * self.weights.frame + sequence_score * self.weights.sequence)
    }

    /// Grade a caller-supplied pair of scores
    pub fn combine(&self, frame_score: f64, sequence_score: f64) -> ScoreCombination {
        let combined_score = self.representative_score(frame_score, sequence_score);
        let score = f64::from(combined_score);
        ScoreCombination {
            frame_score,
            sequence_score,
            combined_score,
            grade: self.grade(score).into(),
            level: self.level(score),
        }
    }

    /// Assemble the result of a whole-sequence analysis
    ///
    /// `frame_scores` holds one score per input frame, in order.
    pub fn aggregate(
        &self,
        mode: AggregationMode,
        frame_scores: Vec<FrameScore>,
        metrics: SequenceMetrics,
        summary: SequenceSummary,
        maxima: &SubScoreMaxima,
    ) -> CombinedResult {
        let totals: Vec<u32> = frame_scores.iter().map(|score| score.total).collect();

        let best_frame_index = match mode {
            AggregationMode::Sequence => best_total_index(&totals),
            AggregationMode::Representative => metrics.representative_frame_index,
        };
        let best_frame_score = frame_scores
            .into_iter()
            .nth(best_frame_index)
            .unwrap_or_else(FrameScore::no_body);

        let combined_score = if summary.total_frames == 0 {
            0
        } else {
            match mode {
                AggregationMode::Sequence => {
                    self.sequence_native_score(best_frame_score.total, &metrics)
                }
                AggregationMode::Representative => self.representative_score(
                    f64::from(best_frame_score.total),
                    summary.sequence_score,
                ),
            }
        };

        let score = f64::from(combined_score);
        let mut feedback = vec![self.overall_message(score)];
        if summary.total_frames == 0 {
            feedback.push(Feedback::correction("No valid motion sequence detected"));
        } else {
            feedback.push(Feedback::info("Best frame analysis"));
            feedback.extend(best_frame_score.feedback.iter().cloned());
            feedback.push(Feedback::info("Motion continuity analysis"));
            feedback.extend(summary.feedback.iter().cloned());
        }

        debug!(
            "Best frame {} scored {}, sequence aggregate {:.1}",
            best_frame_index, best_frame_score.total, summary.sequence_score
        );
        info!(
            "Sequence analysis complete ({:?} mode): combined score {} over {} frames",
            mode, combined_score, summary.total_frames
        );

        CombinedResult {
            mode,
            best_frame_index,
            breakdown: best_frame_score.breakdown(maxima),
            best_frame_score,
            sequence_metrics: metrics,
            sequence_score: summary.sequence_score,
            combined_score,
            grade: GradeInfo::from(self.grade(score)),
            level: self.level(score),
            frame_scores: totals,
            total_frames: summary.total_frames,
            valid_frames: summary.valid_frames,
            feedback,
        }
    }
}

/// Index of the highest total, first on ties; 0 for an empty series
fn best_total_index(totals: &[u32]) -> usize {
    let mut best = 0;
    for (index, total) in totals.iter().enumerate() {
        if *total > totals[best] {
            best = index;
        }
    }
    best
}

use serde::{Deserialize, Serialize};
use std::fmt;

use super::frame_score::{Feedback, FrameScore, ScoreBreakdown};
use super::sequence::SequenceMetrics;
use super::standards::Standards;

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn description(&self) -> &'static str {
        match self {
            Grade::S => "Perfect! Professional level",
            Grade::A => "Excellent! Keep it up",
            Grade::B => "Good! Room to improve",
            Grade::C => "Passing. Keep practicing",
            Grade::D => "Needs improvement. Review the fundamentals",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeInfo {
    pub grade: Grade,
    pub description: String,
}

impl From<Grade> for GradeInfo {
    fn from(grade: Grade) -> Self {
        Self {
            grade,
            description: grade.description().to_string(),
        }
    }
}

/// Training level bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "beginner"),
            Level::Intermediate => write!(f, "intermediate"),
            Level::Advanced => write!(f, "advanced"),
        }
    }
}

/// Level reached by a score and whether it counts as a pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: Level,
    pub passed: bool,
    pub next_level: Option<Level>,
    pub message: String,
}

/// Single-frame analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub body_scale: Option<f64>,
    pub standards: Option<Standards>,
    pub frame_score: FrameScore,
    pub breakdown: ScoreBreakdown,
    pub grade: GradeInfo,
    pub level: LevelInfo,
}

/// Which aggregation path produced a combined result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Best per-frame total blended with smoothness and completeness
    #[default]
    Sequence,
    /// Representative frame blended with the sequence aggregate
    Representative,
}

/// Result of a whole-sequence analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub mode: AggregationMode,
    pub best_frame_index: usize,
    pub best_frame_score: FrameScore,
    pub breakdown: ScoreBreakdown,
    pub sequence_metrics: SequenceMetrics,
    pub sequence_score: f64,
    pub combined_score: u32,
    pub grade: GradeInfo,
    pub level: LevelInfo,
    /// Total per input frame, 0 where no body was detected
    pub frame_scores: Vec<u32>,
    pub total_frames: usize,
    pub valid_frames: usize,
    /// Overall message, best-frame feedback, then sequence commentary
    pub feedback: Vec<Feedback>,
}

/// Frame score blended with a sequence aggregate supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCombination {
    pub frame_score: f64,
    pub sequence_score: f64,
    pub combined_score: u32,
    pub grade: GradeInfo,
    pub level: LevelInfo,
}

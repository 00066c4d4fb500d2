use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::frame_score::Feedback;
use super::landmark::Joint;

/// Frame-aligned path of one joint
///
/// All three series have exactly one entry per input frame; frames without a
/// detection contribute `None` coordinates and zero visibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub visibility: Vec<f64>,
}

impl Trajectory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            visibility: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.visibility.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visibility.is_empty()
    }

    /// Number of frames in which the joint was observed
    pub fn observed(&self) -> usize {
        self.x.iter().filter(|x| x.is_some()).count()
    }
}

/// Temporal quality of a whole sequence, each metric on [0, 100]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceMetrics {
    pub smoothness: f64,
    pub completeness: f64,
    pub consistency: f64,
    /// Clearest frame near the middle of the clip
    pub representative_frame_index: usize,
    pub trajectories: BTreeMap<Joint, Trajectory>,
}

/// Simplified sequence-level aggregate with per-metric commentary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSummary {
    /// 0.4 smoothness + 0.3 completeness + 0.3 consistency (weights configurable)
    pub sequence_score: f64,
    pub smoothness: f64,
    pub completeness: f64,
    pub consistency: f64,
    pub total_frames: usize,
    pub valid_frames: usize,
    pub feedback: Vec<Feedback>,
}

use ndarray::{s, Array1};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::SequenceWeights;
use crate::models::{
    Feedback, Joint, LandmarkFrame, Point, SequenceMetrics, SequenceSummary, Trajectory,
    TRACKED_JOINTS,
};
use crate::services::keypoint_processor::mean_visibility;

/// Score returned when a metric has too little data
pub const NEUTRAL_METRIC: f64 = 50.0;

/// Joints whose visibility measures completeness
const COMPLETENESS_JOINTS: [Joint; 4] = [
    Joint::LeftWrist,
    Joint::RightWrist,
    Joint::LeftShoulder,
    Joint::RightShoulder,
];

/// Joints whose visibility ranks candidate representative frames
const REPRESENTATIVE_JOINTS: [Joint; 8] = [
    Joint::LeftWrist,
    Joint::RightWrist,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftKnee,
    Joint::RightKnee,
];

/// Service computing temporal quality over a whole landmark sequence
///
/// Works on raw coordinates only; it never looks at frame scores.
#[derive(Debug, Clone)]
pub struct SequenceAnalysisService {
    weights: SequenceWeights,
}

impl SequenceAnalysisService {
    /// Create a new SequenceAnalysisService
    pub fn new(weights: SequenceWeights) -> Self {
        Self { weights }
    }

    /// Run every temporal metric over the sequence
    pub fn analyze(&self, frames: &[Option<LandmarkFrame>]) -> SequenceMetrics {
        let metrics = SequenceMetrics {
            smoothness: self.smoothness(frames),
            completeness: self.completeness(frames),
            consistency: self.consistency(frames),
            representative_frame_index: self.representative_frame(frames),
            trajectories: self.trajectories(frames),
        };

        debug!(
            "Sequence of {} frames: smoothness {:.1}, completeness {:.1}, consistency {:.1}, representative frame {}",
            frames.len(),
            metrics.smoothness,
            metrics.completeness,
            metrics.consistency,
            metrics.representative_frame_index
        );

        metrics
    }

    /// Frame-aligned x/y/visibility series for the tracked joints
    pub fn trajectories(&self, frames: &[Option<LandmarkFrame>]) -> BTreeMap<Joint, Trajectory> {
        TRACKED_JOINTS
            .iter()
            .map(|&joint| {
                let mut trajectory = Trajectory::with_capacity(frames.len());
                for frame in frames {
                    match frame.as_ref().and_then(|f| f.get(joint)) {
                        Some(landmark) => {
                            trajectory.x.push(Some(landmark.x));
                            trajectory.y.push(Some(landmark.y));
                            trajectory.visibility.push(landmark.visibility);
                        }
                        None => {
                            trajectory.x.push(None);
                            trajectory.y.push(None);
                            trajectory.visibility.push(0.0);
                        }
                    }
                }
                (joint, trajectory)
            })
            .collect()
    }

    /// Wrist motion smoothness on [0, 100]
    ///
    /// Penalizes the spread of frame-to-frame changes in wrist speed.
    pub fn smoothness(&self, frames: &[Option<LandmarkFrame>]) -> f64 {
        if frames.len() < 3 {
            return NEUTRAL_METRIC;
        }

        let scores: Vec<f64> = [Joint::LeftWrist, Joint::RightWrist]
            .iter()
            .filter_map(|&wrist| {
                let positions: Vec<Point> = frames
                    .iter()
                    .filter_map(|frame| frame.as_ref()?.get(wrist).map(|lm| lm.point()))
                    .filter(|point| point.x.is_finite() && point.y.is_finite())
                    .collect();
                wrist_smoothness(&positions)
            })
            .collect();

        if scores.is_empty() {
            NEUTRAL_METRIC
        } else {
            scores.iter().mean()
        }
    }

    /// Detection coverage and key-joint visibility on [0, 100]
    pub fn completeness(&self, frames: &[Option<LandmarkFrame>]) -> f64 {
        if frames.is_empty() {
            return 0.0;
        }

        let detected: Vec<&LandmarkFrame> = frames.iter().flatten().collect();
        let coverage = detected.len() as f64 / frames.len() as f64 * 100.0;

        let per_frame_visibility: Vec<f64> = detected
            .iter()
            .filter_map(|frame| mean_visibility(&frame.visibilities(&COMPLETENESS_JOINTS)))
            .collect();

        match mean_visibility(&per_frame_visibility) {
            Some(visibility) => (coverage + visibility * 100.0) / 2.0,
            None => coverage,
        }
    }

    /// Stability of left/right wrist symmetry on [0, 100]
    pub fn consistency(&self, frames: &[Option<LandmarkFrame>]) -> f64 {
        if frames.len() < 2 {
            return NEUTRAL_METRIC;
        }

        let symmetry: Vec<f64> = frames
            .iter()
            .flatten()
            .filter_map(|frame| {
                let left = frame.get(Joint::LeftWrist)?;
                let right = frame.get(Joint::RightWrist)?;
                Some((100.0 - (left.y - right.y).abs() * 200.0).max(0.0))
            })
            .collect();

        if symmetry.is_empty() {
            return NEUTRAL_METRIC;
        }

        let mean = symmetry.iter().mean();
        let spread = symmetry.iter().population_std_dev();
        (mean - spread * 0.5).clamp(0.0, 100.0)
    }

    /// Clearest frame, biased towards the middle of the clip; 0 when nothing was detected
    pub fn representative_frame(&self, frames: &[Option<LandmarkFrame>]) -> usize {
        let half = frames.len() as f64 / 2.0;
        let mut best: Option<(usize, f64)> = None;

        for (index, frame) in frames.iter().enumerate() {
            let Some(frame) = frame else { continue };
            let Some(visibility) = mean_visibility(&frame.visibilities(&REPRESENTATIVE_JOINTS))
            else {
                continue;
            };

            let center_bias = 1.0 - (index as f64 - half).abs() / half * 0.2;
            let score = visibility * center_bias;
            if score.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score.total_cmp(&best_score).is_gt()) {
                best = Some((index, score));
            }
        }

        best.map_or(0, |(index, _)| index)
    }

    /// Weighted sequence aggregate with commentary per metric
    pub fn summarize(
        &self,
        metrics: &SequenceMetrics,
        frames: &[Option<LandmarkFrame>],
    ) -> SequenceSummary {
        let total_frames = frames.len();
        let valid_frames = frames.iter().flatten().count();

        let sequence_score = metrics.smoothness * self.weights.smoothness
            + metrics.completeness * self.weights.completeness
            + metrics.consistency * self.weights.consistency;

        let mut feedback = vec![Feedback::info(format!(
            "Analyzed {} frames, {} valid",
            total_frames, valid_frames
        ))];
        feedback.push(band(
            metrics.smoothness,
            "Motion is smooth",
            "Motion is somewhat choppy, keep it continuous",
            "Motion is not smooth, practice the fundamentals",
        ));
        feedback.push(band(
            metrics.completeness,
            "The whole motion was captured clearly",
            "Some frames were not detected clearly",
            "Motion is incomplete, keep your full body in frame throughout",
        ));
        feedback.push(band(
            metrics.consistency,
            "Motion is consistent",
            "Motion stability needs work",
            "Motion is unstable, keep your arms symmetric",
        ));

        SequenceSummary {
            sequence_score,
            smoothness: metrics.smoothness,
            completeness: metrics.completeness,
            consistency: metrics.consistency,
            total_frames,
            valid_frames,
            feedback,
        }
    }
}

/// Smoothness of one wrist path; `None` with fewer than three positions
fn wrist_smoothness(positions: &[Point]) -> Option<f64> {
    if positions.len() < 3 {
        return None;
    }

    let velocities: Array1<f64> = positions
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .collect();
    let accelerations = (&velocities.slice(s![1..]) - &velocities.slice(s![..-1])).mapv(f64::abs);
    let spread: f64 = accelerations.std(0.0);

    Some((100.0_f64 - spread * 1000.0).max(0.0))
}

fn band(value: f64, excellent: &str, fair: &str, poor: &str) -> Feedback {
    if value >= 80.0 {
        Feedback::affirmation(excellent)
    } else if value >= 60.0 {
        Feedback::suggestion(fair)
    } else {
        Feedback::correction(poor)
    }
}

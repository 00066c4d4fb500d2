use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{ScoringConfig, ScoringProfile, StrictTemplate};
use crate::errors::FrameError;
use crate::models::{
    Feedback, FrameMeasurements, FrameScore, Joint, LandmarkFrame, Range, Standards,
    SubScoreMaxima, TRACKED_JOINTS,
};
use crate::services::adaptive_standards_service::AdaptiveStandardsService;
use crate::services::keypoint_processor::{
    joint_midpoint, landmark_angle, joint_angle, mean_depth, mean_height,
    required_mean_visibility,
};
use crate::services::scoring_curve::{linear_error_score, soft_range_score};

/// Points and commentary from one sub-scorer
type SubScore = (f64, Vec<Feedback>);

/// Frame scoring strategy
///
/// Implementations are pure functions of one frame; a malformed frame degrades
/// individual sub-scores and never fails the whole frame.
pub trait ScoringStrategy: Send + Sync {
    fn profile(&self) -> ScoringProfile;

    /// Maximum points per sub-score
    fn maxima(&self) -> SubScoreMaxima;

    /// Score a frame in which a body was detected
    fn score_landmarks(&self, frame: &LandmarkFrame) -> FrameScore;

    /// Score a frame, `None` meaning no body was detected
    fn score_frame(&self, frame: Option<&LandmarkFrame>) -> FrameScore {
        match frame {
            Some(landmarks) => self.score_landmarks(landmarks),
            None => FrameScore::no_body(),
        }
    }
}

/// Build the strategy selected by the configuration
pub fn scorer_for(config: &ScoringConfig) -> Arc<dyn ScoringStrategy> {
    match config.profile {
        ScoringProfile::Tolerant => Arc::new(TolerantScorer::new(config)),
        ScoringProfile::Strict => Arc::new(StrictScorer::new(config)),
    }
}

/// Fold a sub-score into the frame, degrading to zero on a malformed frame
fn settle(category: &str, result: Result<SubScore, FrameError>, feedback: &mut Vec<Feedback>) -> f64 {
    match result {
        Ok((score, mut lines)) => {
            feedback.append(&mut lines);
            score
        }
        Err(err) => {
            warn!("{} sub-score degraded to 0: {}", category, err);
            feedback.push(Feedback::correction(format!(
                "{} posture could not be evaluated: {}",
                category, err
            )));
            0.0
        }
    }
}

fn arm_angles(frame: &LandmarkFrame) -> Result<(f64, f64, f64), FrameError> {
    let left = landmark_angle(frame, Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist)?;
    let right = landmark_angle(frame, Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist)?;
    let shoulder_center = joint_midpoint(frame, Joint::LeftShoulder, Joint::RightShoulder)?;
    let gap = joint_angle(
        frame.require(Joint::LeftWrist)?.point(),
        shoulder_center,
        frame.require(Joint::RightWrist)?.point(),
    )?;
    Ok((left, right, gap))
}

fn knee_angles(frame: &LandmarkFrame) -> Result<(f64, f64), FrameError> {
    let left = landmark_angle(frame, Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle)?;
    let right = landmark_angle(frame, Joint::RightHip, Joint::RightKnee, Joint::RightAnkle)?;
    Ok((left, right))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Left => "Left",
        Side::Right => "Right",
    }
}

// ---------------------------------------------------------------------------
// Tolerant profile
// ---------------------------------------------------------------------------

const ARM_POINTS: f64 = 12.0;
const ARM_GAP_POINTS: f64 = 11.0;
const KNEE_POINTS: f64 = 12.0;
const BALANCE_POINTS: f64 = 6.0;
const WRIST_WINDOW_POINTS: f64 = 15.0;
const WRIST_HEIGHT_POINTS: f64 = 10.0;

/// Range-based soft scoring against body-scale adaptive standards (35/30/25/10)
#[derive(Debug, Clone)]
pub struct TolerantScorer {
    standards: AdaptiveStandardsService,
    position_window: Range,
}

impl TolerantScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            standards: AdaptiveStandardsService::new(config.standards, config.adaptive),
            position_window: config.position_window,
        }
    }

    fn score_arms(
        &self,
        frame: &LandmarkFrame,
        standards: &Standards,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let (left, right, gap) = arm_angles(frame)?;

        let score = (soft_range_score(left, &standards.arm_angle, ARM_POINTS)
            + soft_range_score(right, &standards.arm_angle, ARM_POINTS)
            + soft_range_score(gap, &standards.arm_gap, ARM_GAP_POINTS))
        .min(SubScoreMaxima::TOLERANT.arm);

        let mut feedback = Vec::new();
        for (side, angle) in [(Side::Left, left), (Side::Right, right)] {
            if angle < 140.0 {
                feedback.push(Feedback::suggestion(format!(
                    "{} arm could be straighter",
                    side_label(side)
                )));
            } else if angle >= 160.0 {
                feedback.push(Feedback::affirmation(format!(
                    "{} arm position is good",
                    side_label(side)
                )));
            }
        }
        if gap < 15.0 {
            feedback.push(Feedback::suggestion("Open your arms slightly"));
        } else if gap > 50.0 {
            feedback.push(Feedback::suggestion(
                "Arms are slightly wide, bring them closer together",
            ));
        } else if (20.0..=40.0).contains(&gap) {
            feedback.push(Feedback::affirmation("Arm spacing is standard"));
        }

        measurements.left_arm_angle = Some(left);
        measurements.right_arm_angle = Some(right);
        measurements.arm_gap_angle = Some(gap);
        Ok((score, feedback))
    }

    fn score_body(
        &self,
        frame: &LandmarkFrame,
        standards: &Standards,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let (left, right) = knee_angles(frame)?;
        let difference = (left - right).abs();
        let balance = (BALANCE_POINTS - difference / 10.0).max(0.0);

        let score = (soft_range_score(left, &standards.knee_angle, KNEE_POINTS)
            + soft_range_score(right, &standards.knee_angle, KNEE_POINTS)
            + balance)
            .min(SubScoreMaxima::TOLERANT.body);

        let mut feedback = Vec::new();
        for (side, angle) in [(Side::Left, left), (Side::Right, right)] {
            let label = side_label(side);
            if angle > 140.0 {
                feedback.push(Feedback::suggestion(format!(
                    "{} knee could bend more to lower your center of gravity",
                    label
                )));
            } else if angle < 50.0 {
                feedback.push(Feedback::suggestion(format!(
                    "{} knee is bent too far, center of gravity is too low",
                    label
                )));
            } else {
                feedback.push(Feedback::affirmation(format!("{} knee bend is moderate", label)));
            }
        }
        if difference < 15.0 {
            feedback.push(Feedback::affirmation("Legs are balanced and stable"));
        } else {
            feedback.push(Feedback::suggestion("Keep both legs symmetric for balance"));
        }

        measurements.left_knee_angle = Some(left);
        measurements.right_knee_angle = Some(right);
        measurements.knee_angle_difference = Some(difference);
        Ok((score, feedback))
    }

    fn score_position(
        &self,
        frame: &LandmarkFrame,
        body_scale: f64,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let wrist_y = mean_height(frame, Joint::LeftWrist, Joint::RightWrist)?;
        let shoulder_y = mean_height(frame, Joint::LeftShoulder, Joint::RightShoulder)?;
        let hip_y = mean_height(frame, Joint::LeftHip, Joint::RightHip)?;
        let knee_y = mean_height(frame, Joint::LeftKnee, Joint::RightKnee)?;
        let wrist_z = mean_depth(frame, Joint::LeftWrist, Joint::RightWrist)?;
        let shoulder_z = mean_depth(frame, Joint::LeftShoulder, Joint::RightShoulder)?;

        let wrist_hip_ratio = (wrist_y - hip_y).abs() / body_scale;

        // 0 at shoulder height, 1 at knee height
        let shoulder_knee_span = (knee_y - shoulder_y).abs();
        let wrist_position = if shoulder_knee_span > 0.0 {
            (wrist_y - shoulder_y) / shoulder_knee_span
        } else {
            0.0
        };
        let window_score = soft_range_score(wrist_position, &self.position_window, WRIST_WINDOW_POINTS);

        // Wrists above the hips lose points faster than wrists below them
        let height_score = if wrist_y < hip_y {
            (WRIST_HEIGHT_POINTS - (hip_y - wrist_y) / body_scale * 50.0).max(0.0)
        } else {
            let below = (wrist_y - hip_y) / body_scale;
            if below < 0.3 {
                WRIST_HEIGHT_POINTS
            } else {
                (WRIST_HEIGHT_POINTS - (below - 0.3) * 30.0).max(0.0)
            }
        };

        let score = (window_score + height_score).min(SubScoreMaxima::TOLERANT.position);

        let mut feedback = Vec::new();
        if wrist_y < shoulder_y {
            feedback.push(Feedback::correction(
                "Contact point is too high, meet the ball in front of your waist",
            ));
        } else if wrist_y > knee_y {
            feedback.push(Feedback::correction(
                "Contact point is too low and invites errors",
            ));
        } else if hip_y <= wrist_y && wrist_y <= knee_y {
            feedback.push(Feedback::affirmation(
                "Contact point is standard, in front of and below the waist",
            ));
        } else {
            feedback.push(Feedback::suggestion("Contact point is slightly off"));
        }

        let depth_difference = wrist_z - shoulder_z;
        if depth_difference.abs() < 0.1 {
            feedback.push(Feedback::affirmation("Arms are extended forward well"));
        } else if wrist_z < shoulder_z - 0.15 {
            feedback.push(Feedback::suggestion("Extend your arms slightly further forward"));
        }

        measurements.wrist_position_ratio = Some(wrist_position);
        measurements.wrist_hip_ratio = Some(wrist_hip_ratio);
        measurements.wrist_shoulder_depth_difference = Some(depth_difference);
        Ok((score, feedback))
    }

    fn score_stability(
        &self,
        frame: &LandmarkFrame,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let visibility = required_mean_visibility(frame, &TRACKED_JOINTS)?;
        let score = (visibility * 10.0).clamp(0.0, SubScoreMaxima::TOLERANT.stability);

        let line = if visibility > 0.75 {
            Feedback::affirmation("Pose is clearly detected")
        } else if visibility > 0.5 {
            Feedback::suggestion("Pose detection is borderline, try a better camera angle")
        } else {
            Feedback::correction("Pose is unclear, make sure your full body is in frame")
        };

        measurements.mean_visibility = Some(visibility);
        Ok((score, vec![line]))
    }
}

impl ScoringStrategy for TolerantScorer {
    fn profile(&self) -> ScoringProfile {
        ScoringProfile::Tolerant
    }

    fn maxima(&self) -> SubScoreMaxima {
        SubScoreMaxima::TOLERANT
    }

    fn score_landmarks(&self, frame: &LandmarkFrame) -> FrameScore {
        let (body_scale, standards) = self.standards.standards_for_frame(frame);
        let mut measurements = FrameMeasurements {
            body_scale: Some(body_scale),
            ..FrameMeasurements::default()
        };
        let mut feedback = Vec::new();

        let arm = settle("Arm", self.score_arms(frame, &standards, &mut measurements), &mut feedback);
        let body = settle("Body", self.score_body(frame, &standards, &mut measurements), &mut feedback);
        let position = settle(
            "Position",
            self.score_position(frame, body_scale, &mut measurements),
            &mut feedback,
        );
        let stability = settle("Stability", self.score_stability(frame, &mut measurements), &mut feedback);

        let score = FrameScore::from_parts(arm, body, position, stability, feedback, measurements);
        debug!(
            "Tolerant frame score {} (arm {:.1}, body {:.1}, position {:.1}, stability {:.1})",
            score.total, arm, body, position, stability
        );
        score
    }
}

// ---------------------------------------------------------------------------
// Strict profile
// ---------------------------------------------------------------------------

/// Linear error against a fixed template (40/30/20/10)
#[derive(Debug, Clone)]
pub struct StrictScorer {
    template: StrictTemplate,
}

impl StrictScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            template: config.template,
        }
    }

    fn score_arms(
        &self,
        frame: &LandmarkFrame,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let (left, right, gap) = arm_angles(frame)?;

        let score = linear_error_score(left, self.template.arm_angle, 10.0, 3.0)
            + linear_error_score(right, self.template.arm_angle, 10.0, 3.0)
            + linear_error_score(gap, self.template.arm_gap_angle, 20.0, 2.0);

        let mut feedback = Vec::new();
        for (side, angle) in [(Side::Left, left), (Side::Right, right)] {
            let label = side_label(side);
            if angle < 140.0 {
                feedback.push(Feedback::correction(format!(
                    "{} arm is bent too much, straighten it",
                    label
                )));
            } else if angle > 175.0 {
                feedback.push(Feedback::affirmation(format!("{} arm position is standard", label)));
            }
        }
        if gap < 15.0 {
            feedback.push(Feedback::correction(
                "Arms are too close together, open them to shoulder width",
            ));
        } else if gap > 40.0 {
            feedback.push(Feedback::correction("Arms are too wide, bring them together"));
        } else {
            feedback.push(Feedback::affirmation("Arm spacing is appropriate"));
        }

        measurements.left_arm_angle = Some(left);
        measurements.right_arm_angle = Some(right);
        measurements.arm_gap_angle = Some(gap);
        Ok((score, feedback))
    }

    fn score_body(
        &self,
        frame: &LandmarkFrame,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let (left, right) = knee_angles(frame)?;
        let hip_y = mean_height(frame, Joint::LeftHip, Joint::RightHip)?;
        let shoulder_y = mean_height(frame, Joint::LeftShoulder, Joint::RightShoulder)?;
        let hip_drop = hip_y - shoulder_y;

        let hip_score = if hip_drop > 0.15 && hip_drop < 0.25 { 10.0 } else { 5.0 };
        let score = linear_error_score(left, self.template.knee_angle, 10.0, 5.0)
            + linear_error_score(right, self.template.knee_angle, 10.0, 5.0)
            + hip_score;

        let mut feedback = Vec::new();
        for (side, angle) in [(Side::Left, left), (Side::Right, right)] {
            let label = side_label(side);
            if angle > 160.0 {
                feedback.push(Feedback::correction(format!(
                    "{} leg is too straight, bend the knee",
                    label
                )));
            } else if angle < 60.0 {
                feedback.push(Feedback::correction(format!(
                    "{} leg is bent too much, center of gravity is too low",
                    label
                )));
            } else {
                feedback.push(Feedback::affirmation(format!("{} knee bend is moderate", label)));
            }
        }

        measurements.left_knee_angle = Some(left);
        measurements.right_knee_angle = Some(right);
        measurements.knee_angle_difference = Some((left - right).abs());
        Ok((score, feedback))
    }

    fn score_position(
        &self,
        frame: &LandmarkFrame,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let wrist_y = mean_height(frame, Joint::LeftWrist, Joint::RightWrist)?;
        let hip_y = mean_height(frame, Joint::LeftHip, Joint::RightHip)?;
        let shoulder_y = mean_height(frame, Joint::LeftShoulder, Joint::RightShoulder)?;

        // 0 at shoulder height, 1 at hip height
        let relative = (wrist_y - shoulder_y) / (hip_y - shoulder_y + 1e-6);
        if !relative.is_finite() {
            return Err(FrameError::NonFinite("wrist position"));
        }

        let (score, line) = if relative > 1.2 && relative < 2.0 {
            (20.0, Feedback::affirmation("Contact point is standard, in front of the waist"))
        } else if relative > 0.8 && relative < 2.5 {
            (12.0, Feedback::suggestion("Contact point is slightly high or low"))
        } else {
            (5.0, Feedback::correction("Contact point is incorrect"))
        };

        measurements.wrist_position_ratio = Some(relative);
        Ok((score, vec![line]))
    }

    fn score_stability(
        &self,
        frame: &LandmarkFrame,
        measurements: &mut FrameMeasurements,
    ) -> Result<SubScore, FrameError> {
        let visibility = required_mean_visibility(frame, &TRACKED_JOINTS)?;
        let score = (visibility * 10.0).clamp(0.0, SubScoreMaxima::STRICT.stability);

        let line = if visibility > 0.8 {
            Feedback::affirmation("Pose is clearly and stably detected")
        } else if visibility > 0.6 {
            Feedback::suggestion("Pose detection is borderline, try a better camera angle")
        } else {
            Feedback::correction(
                "Pose is unclear, make sure your full body is in frame and well lit",
            )
        };

        measurements.mean_visibility = Some(visibility);
        Ok((score, vec![line]))
    }
}

impl ScoringStrategy for StrictScorer {
    fn profile(&self) -> ScoringProfile {
        ScoringProfile::Strict
    }

    fn maxima(&self) -> SubScoreMaxima {
        SubScoreMaxima::STRICT
    }

    fn score_landmarks(&self, frame: &LandmarkFrame) -> FrameScore {
        let mut measurements = FrameMeasurements::default();
        let mut feedback = Vec::new();

        let arm = settle("Arm", self.score_arms(frame, &mut measurements), &mut feedback);
        let body = settle("Body", self.score_body(frame, &mut measurements), &mut feedback);
        let position = settle("Position", self.score_position(frame, &mut measurements), &mut feedback);
        let stability = settle("Stability", self.score_stability(frame, &mut measurements), &mut feedback);

        let score = FrameScore::from_parts(arm, body, position, stability, feedback, measurements);
        debug!(
            "Strict frame score {} (arm {:.1}, body {:.1}, position {:.1}, stability {:.1})",
            score.total, arm, body, position, stability
        );
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedbackKind, Landmark};

    /// Textbook forearm pass: straight arms joined below the waist, knees bent
    fn ready_position() -> LandmarkFrame {
        [
            (Joint::Nose, 0.50, 0.10, 0.0),
            (Joint::LeftShoulder, 0.42, 0.25, 0.0),
            (Joint::RightShoulder, 0.58, 0.25, 0.0),
            (Joint::LeftElbow, 0.46, 0.40, -0.02),
            (Joint::RightElbow, 0.54, 0.40, -0.02),
            (Joint::LeftWrist, 0.49, 0.52, -0.05),
            (Joint::RightWrist, 0.51, 0.52, -0.05),
            (Joint::LeftHip, 0.44, 0.50, 0.0),
            (Joint::RightHip, 0.56, 0.50, 0.0),
            (Joint::LeftKnee, 0.30, 0.67, 0.0),
            (Joint::RightKnee, 0.70, 0.67, 0.0),
            (Joint::LeftAnkle, 0.44, 0.86, 0.0),
            (Joint::RightAnkle, 0.56, 0.86, 0.0),
        ]
        .into_iter()
        .map(|(joint, x, y, z)| (joint, Landmark::new(x, y, z, 0.95)))
        .collect()
    }

    fn without(frame: &LandmarkFrame, missing: Joint) -> LandmarkFrame {
        frame
            .iter()
            .filter(|(joint, _)| **joint != missing)
            .map(|(joint, landmark)| (*joint, *landmark))
            .collect()
    }

    fn assert_within_maxima(score: &FrameScore, maxima: &SubScoreMaxima) {
        assert!(score.arm >= 0.0 && score.arm <= maxima.arm);
        assert!(score.body >= 0.0 && score.body <= maxima.body);
        assert!(score.position >= 0.0 && score.position <= maxima.position);
        assert!(score.stability >= 0.0 && score.stability <= maxima.stability);
        let sum = score.arm + score.body + score.position + score.stability;
        assert_eq!(score.total, sum as u32);
    }

    #[test]
    fn test_no_body_frame() {
        let scorer = TolerantScorer::new(&ScoringConfig::default());
        let score = scorer.score_frame(None);
        assert_eq!(score.total, 0);
        assert!(!score.feedback.is_empty());
    }

    #[test]
    fn test_ready_position_scores_high() {
        let scorer = TolerantScorer::new(&ScoringConfig::default());
        let score = scorer.score_frame(Some(&ready_position()));
        // both arms straight, knees near 104 degrees, wrists just below the hips
        assert!(score.arm >= 24.0);
        assert!((score.body - 30.0).abs() < 1e-9);
        assert!((score.position - 25.0).abs() < 1e-9);
        assert!(score.total >= 85);
    }

    #[test]
    fn test_tolerant_scores_stay_within_maxima() {
        let scorer = TolerantScorer::new(&ScoringConfig::default());
        let score = scorer.score_frame(Some(&ready_position()));
        assert_within_maxima(&score, &scorer.maxima());
        assert!(score.stability > 9.0);
        assert!(score.measurements.left_arm_angle.is_some());
        assert!(score.measurements.body_scale.is_some());
    }

    #[test]
    fn test_strict_scores_stay_within_maxima() {
        let scorer = StrictScorer::new(&ScoringConfig::for_profile(ScoringProfile::Strict));
        let score = scorer.score_frame(Some(&ready_position()));
        assert_within_maxima(&score, &scorer.maxima());
    }

    #[test]
    fn test_missing_wrist_only_zeroes_affected_sub_scores() {
        let scorer = TolerantScorer::new(&ScoringConfig::default());
        let frame = without(&ready_position(), Joint::LeftWrist);
        let score = scorer.score_frame(Some(&frame));

        assert_eq!(score.arm, 0.0);
        assert_eq!(score.position, 0.0);
        assert_eq!(score.stability, 0.0);
        assert!(score.body > 0.0);
        assert_eq!(score.measurements.left_arm_angle, None);
        assert!(score.measurements.left_knee_angle.is_some());

        let first = &score.feedback[0];
        assert_eq!(first.kind, FeedbackKind::Correction);
        assert!(first.message.contains("left_wrist"));
    }

    #[test]
    fn test_coincident_joints_degrade_arm_score() {
        let scorer = TolerantScorer::new(&ScoringConfig::default());
        let mut landmarks: Vec<(Joint, Landmark)> = ready_position()
            .iter()
            .map(|(joint, landmark)| (*joint, *landmark))
            .collect();
        for (joint, landmark) in landmarks.iter_mut() {
            if *joint == Joint::LeftElbow {
                *landmark = Landmark::new(0.42, 0.25, 0.0, 0.95);
            }
        }
        let frame: LandmarkFrame = landmarks.into_iter().collect();
        let score = scorer.score_frame(Some(&frame));
        assert_eq!(score.arm, 0.0);
        assert!(score.body > 0.0);
    }

    #[test]
    fn test_feedback_follows_evaluation_order() {
        let scorer = TolerantScorer::new(&ScoringConfig::default());
        let score = scorer.score_frame(Some(&ready_position()));
        let last = score.feedback.last().map(|f| f.message.as_str());
        assert_eq!(last, Some("Pose is clearly detected"));
    }

    #[test]
    fn test_scorer_for_profile() {
        let strict = scorer_for(&ScoringConfig::for_profile(ScoringProfile::Strict));
        assert_eq!(strict.profile(), ScoringProfile::Strict);
        assert_eq!(strict.maxima(), SubScoreMaxima::STRICT);
        let tolerant = scorer_for(&ScoringConfig::default());
        assert_eq!(tolerant.profile(), ScoringProfile::Tolerant);
    }

    #[test]
    fn test_side_label() {
        assert_eq!(side_label(Side::Left), "Left");
        assert_eq!(side_label(Side::Right), "Right");
    }
}

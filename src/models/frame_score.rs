use serde::{Deserialize, Serialize};

/// How a feedback line should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    /// Neutral commentary or section header
    Info,
    /// The element is performed well
    Affirmation,
    /// Minor deviation, worth adjusting
    Suggestion,
    /// Clear fault or an element that could not be evaluated
    Correction,
}

/// A single diagnostic line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: FeedbackKind::Info, message: message.into() }
    }

    pub fn affirmation(message: impl Into<String>) -> Self {
        Self { kind: FeedbackKind::Affirmation, message: message.into() }
    }

    pub fn suggestion(message: impl Into<String>) -> Self {
        Self { kind: FeedbackKind::Suggestion, message: message.into() }
    }

    pub fn correction(message: impl Into<String>) -> Self {
        Self { kind: FeedbackKind::Correction, message: message.into() }
    }
}

/// Maximum points per sub-score for a scoring profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScoreMaxima {
    pub arm: f64,
    pub body: f64,
    pub position: f64,
    pub stability: f64,
}

impl SubScoreMaxima {
    /// 35/30/25/10, the tolerant profile
    pub const TOLERANT: Self = Self {
        arm: 35.0,
        body: 30.0,
        position: 25.0,
        stability: 10.0,
    };

    /// 40/30/20/10, the strict profile
    pub const STRICT: Self = Self {
        arm: 40.0,
        body: 30.0,
        position: 20.0,
        stability: 10.0,
    };

    pub fn total(&self) -> f64 {
        self.arm + self.body + self.position + self.stability
    }
}

/// Raw measurements behind a frame score
///
/// A field is `None` when the sub-scorer that owns it could not evaluate the frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMeasurements {
    pub body_scale: Option<f64>,
    pub left_arm_angle: Option<f64>,
    pub right_arm_angle: Option<f64>,
    pub arm_gap_angle: Option<f64>,
    pub left_knee_angle: Option<f64>,
    pub right_knee_angle: Option<f64>,
    pub knee_angle_difference: Option<f64>,
    pub wrist_position_ratio: Option<f64>,
    pub wrist_hip_ratio: Option<f64>,
    pub wrist_shoulder_depth_difference: Option<f64>,
    pub mean_visibility: Option<f64>,
}

/// Biomechanical score of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameScore {
    /// Sum of the sub-scores, truncated
    pub total: u32,
    pub arm: f64,
    pub body: f64,
    pub position: f64,
    pub stability: f64,
    /// Ordered arm, body, position, stability
    pub feedback: Vec<Feedback>,
    #[serde(default)]
    pub measurements: FrameMeasurements,
}

impl FrameScore {
    /// Score for a frame in which no body was detected
    pub fn no_body() -> Self {
        Self {
            total: 0,
            arm: 0.0,
            body: 0.0,
            position: 0.0,
            stability: 0.0,
            feedback: vec![Feedback::correction(
                "No body detected; make sure your full body is in frame",
            )],
            measurements: FrameMeasurements::default(),
        }
    }

    /// Assemble a score from its sub-scores; the total is truncated
    pub fn from_parts(
        arm: f64,
        body: f64,
        position: f64,
        stability: f64,
        feedback: Vec<Feedback>,
        measurements: FrameMeasurements,
    ) -> Self {
        let total = (arm + body + position + stability).clamp(0.0, 100.0) as u32;
        Self {
            total,
            arm,
            body,
            position,
            stability,
            feedback,
            measurements,
        }
    }

    /// Sub-scores as a percentage of their maxima
    pub fn breakdown(&self, maxima: &SubScoreMaxima) -> ScoreBreakdown {
        let pct = |value: f64, max: f64| if max > 0.0 { value / max * 100.0 } else { 0.0 };
        ScoreBreakdown {
            arm: pct(self.arm, maxima.arm),
            body: pct(self.body, maxima.body),
            position: pct(self.position, maxima.position),
            stability: pct(self.stability, maxima.stability),
        }
    }
}

/// Per-category percentages, for radar-style displays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub arm: f64,
    pub body: f64,
    pub position: f64,
    pub stability: f64,
}

use tracing::debug;

use crate::config::AdaptiveConfig;
use crate::errors::FrameError;
use crate::models::{Joint, LandmarkFrame, Standards};
use crate::services::keypoint_processor::joint_midpoint;

/// Scale returned when the body cannot be measured
pub const NEUTRAL_BODY_SCALE: f64 = 1.0;

/// Shoulder-to-ankle span misses the head segment
const HEAD_COMPENSATION: f64 = 1.15;

/// Which range table a scale factor selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyBucket {
    Short,
    Reference,
    Tall,
}

/// Service deriving per-frame threshold ranges from the estimated body scale
#[derive(Debug, Clone)]
pub struct AdaptiveStandardsService {
    base: Standards,
    adaptive: AdaptiveConfig,
}

impl AdaptiveStandardsService {
    /// Create a new AdaptiveStandardsService
    pub fn new(base: Standards, adaptive: AdaptiveConfig) -> Self {
        Self { base, adaptive }
    }

    /// Normalized body scale, or 1.0 when it cannot be measured
    pub fn body_scale(&self, frame: &LandmarkFrame) -> f64 {
        match measure_body_scale(frame) {
            Ok(scale) => scale,
            Err(err) => {
                debug!("Body scale unavailable ({}), using neutral scale", err);
                NEUTRAL_BODY_SCALE
            }
        }
    }

    /// Bucket a scale falls into; factors equal to a boundary stay in the reference bucket
    pub fn bucket(&self, scale: f64) -> BodyBucket {
        let factor = scale / self.adaptive.reference_scale;
        if factor > self.adaptive.tall_factor {
            BodyBucket::Tall
        } else if factor < self.adaptive.short_factor {
            BodyBucket::Short
        } else {
            BodyBucket::Reference
        }
    }

    /// Threshold table for a given body scale
    pub fn standards_for_scale(&self, scale: f64) -> Standards {
        let mut standards = self.base;
        match self.bucket(scale) {
            BodyBucket::Tall => {
                standards.arm_angle = self.adaptive.tall_arm_angle;
                standards.knee_angle = self.adaptive.tall_knee_angle;
            }
            BodyBucket::Short => {
                standards.arm_angle = self.adaptive.short_arm_angle;
                standards.knee_angle = self.adaptive.short_knee_angle;
            }
            BodyBucket::Reference => {}
        }
        standards
    }

    /// Body scale and the standards derived from it
    pub fn standards_for_frame(&self, frame: &LandmarkFrame) -> (f64, Standards) {
        let scale = self.body_scale(frame);
        (scale, self.standards_for_scale(scale))
    }
}

/// Average of the head-to-ankle span and the compensated shoulder-to-ankle span
fn measure_body_scale(frame: &LandmarkFrame) -> Result<f64, FrameError> {
    let nose = frame.require(Joint::Nose)?.y;
    let shoulders = joint_midpoint(frame, Joint::LeftShoulder, Joint::RightShoulder)?.y;
    let ankles = joint_midpoint(frame, Joint::LeftAnkle, Joint::RightAnkle)?.y;

    let head_to_ankle = (ankles - nose).abs();
    let shoulder_to_ankle = (ankles - shoulders).abs() * HEAD_COMPENSATION;
    let scale = (head_to_ankle + shoulder_to_ankle) / 2.0;

    if !scale.is_finite() {
        return Err(FrameError::NonFinite("body scale"));
    }
    if scale <= 0.0 {
        return Err(FrameError::DegenerateVector("body scale"));
    }
    Ok(scale)
}

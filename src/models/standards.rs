use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Inclusive numeric range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Reject non-finite or non-monotonic bounds
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Threshold ranges used to score a single frame
///
/// Derived per frame from the estimated body scale; a value object that is
/// recomputed, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Standards {
    /// Shoulder-elbow-wrist angle, degrees
    pub arm_angle: Range,
    /// Angle between the wrists at the shoulder midpoint, degrees
    pub arm_gap: Range,
    /// Hip-knee-ankle angle, degrees
    pub knee_angle: Range,
}

impl Standards {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arm_angle.validate("arm_angle")?;
        self.arm_gap.validate("arm_gap")?;
        self.knee_angle.validate("knee_angle")?;
        Ok(())
    }
}

impl Default for Standards {
    fn default() -> Self {
        Self {
            arm_angle: Range::new(150.0, 180.0),
            arm_gap: Range::new(15.0, 45.0),
            knee_angle: Range::new(60.0, 120.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = Range::new(150.0, 180.0);
        assert!(range.contains(150.0));
        assert!(range.contains(180.0));
        assert!(!range.contains(149.9));
    }

    #[test]
    fn test_range_validation() {
        assert!(Range::new(1.0, 2.0).validate("ok").is_ok());
        assert!(Range::new(2.0, 2.0).validate("point").is_ok());
        assert!(Range::new(3.0, 2.0).validate("reversed").is_err());
        assert!(Range::new(f64::NAN, 2.0).validate("nan").is_err());
    }

    #[test]
    fn test_default_standards_are_valid() {
        assert!(Standards::default().validate().is_ok());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::ConfigError;
use crate::models::{Range, Standards};

/// Frame scoring strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringProfile {
    /// Range-based soft scoring with adaptive standards (35/30/25/10)
    #[default]
    Tolerant,
    /// Linear error against a fixed template (40/30/20/10)
    Strict,
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringProfile::Tolerant => write!(f, "tolerant"),
            ScoringProfile::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ScoringProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tolerant" => Ok(ScoringProfile::Tolerant),
            "strict" => Ok(ScoringProfile::Strict),
            other => Err(format!("unknown scoring profile: {}", other)),
        }
    }
}

/// Body-scale calibration of the standards table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// Population-average normalized body scale
    #[serde(default = "default_reference_scale")]
    pub reference_scale: f64,
    /// Scale factor above which the tall-body ranges apply
    #[serde(default = "default_tall_factor")]
    pub tall_factor: f64,
    /// Scale factor below which the short-body ranges apply
    #[serde(default = "default_short_factor")]
    pub short_factor: f64,
    #[serde(default = "default_tall_arm_angle")]
    pub tall_arm_angle: Range,
    #[serde(default = "default_tall_knee_angle")]
    pub tall_knee_angle: Range,
    #[serde(default = "default_short_arm_angle")]
    pub short_arm_angle: Range,
    #[serde(default = "default_short_knee_angle")]
    pub short_knee_angle: Range,
}

/// Fixed targets for the strict profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrictTemplate {
    #[serde(default = "default_template_arm_angle")]
    pub arm_angle: f64,
    #[serde(default = "default_template_arm_gap_angle")]
    pub arm_gap_angle: f64,
    #[serde(default = "default_template_knee_angle")]
    pub knee_angle: f64,
}

/// Score thresholds for each letter grade, descending
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub s: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl GradeThresholds {
    pub const TOLERANT: Self = Self {
        s: 85.0,
        a: 75.0,
        b: 65.0,
        c: 55.0,
    };

    pub const STRICT: Self = Self {
        s: 90.0,
        a: 80.0,
        b: 70.0,
        c: 60.0,
    };

    pub fn for_profile(profile: ScoringProfile) -> Self {
        match profile {
            ScoringProfile::Tolerant => Self::TOLERANT,
            ScoringProfile::Strict => Self::STRICT,
        }
    }
}

/// Minimum scores for each training level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelThresholds {
    #[serde(default = "default_level_advanced")]
    pub advanced: f64,
    #[serde(default = "default_level_intermediate")]
    pub intermediate: f64,
    #[serde(default = "default_level_beginner")]
    pub beginner: f64,
}

/// Weights for blending frame and sequence scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinationWeights {
    /// Sequence path: weight of the best per-frame total
    #[serde(default = "default_best_frame_weight")]
    pub best_frame: f64,
    /// Sequence path: weight of smoothness (0-100)
    #[serde(default = "default_smoothness_weight")]
    pub smoothness: f64,
    /// Sequence path: weight of completeness (0-100)
    #[serde(default = "default_completeness_weight")]
    pub completeness: f64,
    /// Representative path: weight of the frame score
    #[serde(default = "default_frame_weight")]
    pub frame: f64,
    /// Representative path: weight of the sequence aggregate
    #[serde(default = "default_sequence_weight")]
    pub sequence: f64,
}

/// Weights of the simplified sequence aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceWeights {
    #[serde(default = "default_seq_smoothness")]
    pub smoothness: f64,
    #[serde(default = "default_seq_completeness")]
    pub completeness: f64,
    #[serde(default = "default_seq_consistency")]
    pub consistency: f64,
}

/// Complete scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub profile: ScoringProfile,

    #[serde(default)]
    pub standards: Standards,

    #[serde(default)]
    pub adaptive: AdaptiveConfig,

    /// Ideal wrist position between shoulders (0) and knees (1)
    #[serde(default = "default_position_window")]
    pub position_window: Range,

    #[serde(default)]
    pub template: StrictTemplate,

    /// Overrides the profile's default grade table
    #[serde(default)]
    pub grades: Option<GradeThresholds>,

    #[serde(default)]
    pub levels: LevelThresholds,

    #[serde(default)]
    pub combination: CombinationWeights,

    #[serde(default)]
    pub sequence: SequenceWeights,
}

// Default value functions
fn default_reference_scale() -> f64 {
    0.7
}

fn default_tall_factor() -> f64 {
    1.1
}

fn default_short_factor() -> f64 {
    0.9
}

fn default_tall_arm_angle() -> Range {
    Range::new(145.0, 180.0)
}

fn default_tall_knee_angle() -> Range {
    Range::new(65.0, 125.0)
}

fn default_short_arm_angle() -> Range {
    Range::new(150.0, 180.0)
}

fn default_short_knee_angle() -> Range {
    Range::new(55.0, 115.0)
}

fn default_template_arm_angle() -> f64 {
    165.0
}

fn default_template_arm_gap_angle() -> f64 {
    25.0
}

fn default_template_knee_angle() -> f64 {
    75.0
}

fn default_level_advanced() -> f64 {
    85.0
}

fn default_level_intermediate() -> f64 {
    70.0
}

fn default_level_beginner() -> f64 {
    50.0
}

fn default_best_frame_weight() -> f64 {
    0.6
}

fn default_smoothness_weight() -> f64 {
    0.25
}

fn default_completeness_weight() -> f64 {
    0.15
}

fn default_frame_weight() -> f64 {
    0.6
}

fn default_sequence_weight() -> f64 {
    0.4
}

fn default_seq_smoothness() -> f64 {
    0.4
}

fn default_seq_completeness() -> f64 {
    0.3
}

fn default_seq_consistency() -> f64 {
    0.3
}

fn default_position_window() -> Range {
    Range::new(0.5, 1.3)
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            reference_scale: default_reference_scale(),
            tall_factor: default_tall_factor(),
            short_factor: default_short_factor(),
            tall_arm_angle: default_tall_arm_angle(),
            tall_knee_angle: default_tall_knee_angle(),
            short_arm_angle: default_short_arm_angle(),
            short_knee_angle: default_short_knee_angle(),
        }
    }
}

impl Default for StrictTemplate {
    fn default() -> Self {
        Self {
            arm_angle: default_template_arm_angle(),
            arm_gap_angle: default_template_arm_gap_angle(),
            knee_angle: default_template_knee_angle(),
        }
    }
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            advanced: default_level_advanced(),
            intermediate: default_level_intermediate(),
            beginner: default_level_beginner(),
        }
    }
}

impl Default for CombinationWeights {
    fn default() -> Self {
        Self {
            best_frame: default_best_frame_weight(),
            smoothness: default_smoothness_weight(),
            completeness: default_completeness_weight(),
            frame: default_frame_weight(),
            sequence: default_sequence_weight(),
        }
    }
}

impl Default for SequenceWeights {
    fn default() -> Self {
        Self {
            smoothness: default_seq_smoothness(),
            completeness: default_seq_completeness(),
            consistency: default_seq_consistency(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            profile: ScoringProfile::default(),
            standards: Standards::default(),
            adaptive: AdaptiveConfig::default(),
            position_window: default_position_window(),
            template: StrictTemplate::default(),
            grades: None,
            levels: LevelThresholds::default(),
            combination: CombinationWeights::default(),
            sequence: SequenceWeights::default(),
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

fn check_weights(name: &str, weights: &[f64]) -> Result<(), ConfigError> {
    let valid = weights.iter().all(|w| w.is_finite() && *w >= 0.0)
        && (weights.iter().sum::<f64>() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE;
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeights(name.to_string()))
    }
}

fn check_descending(name: &str, thresholds: &[f64]) -> Result<(), ConfigError> {
    let finite = thresholds.iter().all(|t| t.is_finite());
    let descending = thresholds.windows(2).all(|pair| pair[0] > pair[1]);
    if finite && descending {
        Ok(())
    } else {
        Err(ConfigError::InvalidThresholds(name.to_string()))
    }
}

impl ScoringConfig {
    /// Defaults for a given profile
    pub fn for_profile(profile: ScoringProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Grade table in effect: explicit override or the profile default
    pub fn grade_thresholds(&self) -> GradeThresholds {
        self.grades
            .unwrap_or_else(|| GradeThresholds::for_profile(self.profile))
    }

    /// Check every table; an invalid configuration cannot produce meaningful scores
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.standards.validate()?;
        self.position_window.validate("position_window")?;
        self.adaptive.tall_arm_angle.validate("adaptive.tall_arm_angle")?;
        self.adaptive.tall_knee_angle.validate("adaptive.tall_knee_angle")?;
        self.adaptive.short_arm_angle.validate("adaptive.short_arm_angle")?;
        self.adaptive.short_knee_angle.validate("adaptive.short_knee_angle")?;

        let adaptive = &self.adaptive;
        if !(adaptive.reference_scale.is_finite() && adaptive.reference_scale > 0.0) {
            return Err(ConfigError::InvalidThresholds(
                "adaptive.reference_scale".to_string(),
            ));
        }
        check_descending(
            "adaptive factors",
            &[adaptive.tall_factor, adaptive.short_factor],
        )?;

        let template = &self.template;
        if ![template.arm_angle, template.arm_gap_angle, template.knee_angle]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ConfigError::InvalidThresholds("template".to_string()));
        }

        let grades = self.grade_thresholds();
        check_descending("grades", &[grades.s, grades.a, grades.b, grades.c])?;
        check_descending(
            "levels",
            &[
                self.levels.advanced,
                self.levels.intermediate,
                self.levels.beginner,
            ],
        )?;

        let combination = &self.combination;
        check_weights(
            "combination (sequence path)",
            &[
                combination.best_frame,
                combination.smoothness,
                combination.completeness,
            ],
        )?;
        check_weights(
            "combination (representative path)",
            &[combination.frame, combination.sequence],
        )?;
        check_weights(
            "sequence",
            &[
                self.sequence.smoothness,
                self.sequence.completeness,
                self.sequence.consistency,
            ],
        )?;

        Ok(())
    }
}

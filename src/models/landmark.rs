/// Landmark models for pose sequences
///
/// A frame is a mapping from the thirteen tracked joints to normalized
/// image-relative coordinates, as produced by the upstream pose estimator.
/// `None` in a sequence stands for "no body detected in this frame".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::FrameError;

/// Joints reported by the pose estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// Get joint name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// All joints in estimator order
    pub fn all() -> [Self; 13] {
        [
            Self::Nose,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftElbow,
            Self::RightElbow,
            Self::LeftWrist,
            Self::RightWrist,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
        ]
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Torso and limb joints used for stability and trajectory tracking
pub const TRACKED_JOINTS: [Joint; 10] = [
    Joint::LeftWrist,
    Joint::RightWrist,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftKnee,
    Joint::RightKnee,
];

/// A 2D point in normalized image space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points
    pub fn midpoint(a: Point, b: Point) -> Self {
        Self::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One joint observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate normalized to image width
    pub x: f64,
    /// Y coordinate normalized to image height (grows downwards)
    pub y: f64,
    /// Relative depth
    #[serde(default)]
    pub z: f64,
    /// Estimator confidence that the joint is visible; may slightly exceed 1
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Landmarks of a single frame in which a body was detected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    landmarks: BTreeMap<Joint, Landmark>,
}

impl LandmarkFrame {
    pub fn new(landmarks: BTreeMap<Joint, Landmark>) -> Self {
        Self { landmarks }
    }

    /// Get landmark by joint
    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.landmarks.get(&joint)
    }

    /// Get landmark by joint, failing with `MissingJoint`
    pub fn require(&self, joint: Joint) -> Result<&Landmark, FrameError> {
        self.get(joint).ok_or(FrameError::MissingJoint(joint))
    }

    pub fn contains(&self, joint: Joint) -> bool {
        self.landmarks.contains_key(&joint)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Joint, &Landmark)> {
        self.landmarks.iter()
    }

    /// Visibility values of the requested joints that are present
    pub fn visibilities(&self, joints: &[Joint]) -> Vec<f64> {
        joints
            .iter()
            .filter_map(|joint| self.get(*joint).map(|lm| lm.visibility))
            .collect()
    }
}

impl FromIterator<(Joint, Landmark)> for LandmarkFrame {
    fn from_iter<I: IntoIterator<Item = (Joint, Landmark)>>(iter: I) -> Self {
        Self {
            landmarks: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_names() {
        assert_eq!(Joint::Nose.name(), "nose");
        assert_eq!(Joint::LeftShoulder.name(), "left_shoulder");
        assert_eq!(Joint::RightAnkle.name(), "right_ankle");
        assert_eq!(Joint::all().len(), 13);
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_deserializes_from_joint_map() {
        let json = r#"{
            "nose": {"x": 0.5, "y": 0.1, "z": -0.2, "visibility": 0.99},
            "left_wrist": {"x": 0.45, "y": 0.6}
        }"#;
        let frame: LandmarkFrame = serde_json::from_str(json).unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(Joint::Nose).unwrap().visibility, 0.99);
        // z and visibility default to 0 when the estimator omits them
        assert_eq!(frame.get(Joint::LeftWrist).unwrap().visibility, 0.0);
        assert!(frame.get(Joint::RightWrist).is_none());
    }

    #[test]
    fn test_sequence_with_missing_body() {
        let json = r#"[{"nose": {"x": 0.5, "y": 0.1}}, null]"#;
        let frames: Vec<Option<LandmarkFrame>> = serde_json::from_str(json).unwrap();
        assert!(frames[0].is_some());
        assert!(frames[1].is_none());
    }

    #[test]
    fn test_require_reports_missing_joint() {
        let frame = LandmarkFrame::default();
        assert_eq!(
            frame.require(Joint::LeftKnee),
            Err(FrameError::MissingJoint(Joint::LeftKnee))
        );
    }
}

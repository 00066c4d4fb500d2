/// Keypoint geometry shared by every scorer
///
/// - Joint angle at a vertex (dot-product formula with an epsilon guard)
/// - Paired-joint midpoints and mean heights/depths
/// - Visibility averaging

use statrs::statistics::Statistics;

use crate::errors::FrameError;
use crate::models::{Joint, LandmarkFrame, Point};

/// Guards the angle formula against near-zero-length vectors
pub const ANGLE_EPSILON: f64 = 1e-6;

/// Calculate the angle at `vertex` formed by `point_a` and `point_c`
///
/// # Returns
/// Angle in degrees on [0, 180]
pub fn joint_angle(point_a: Point, vertex: Point, point_c: Point) -> Result<f64, FrameError> {
    // Vectors from the vertex to the adjacent points
    let vec_a = (point_a.x - vertex.x, point_a.y - vertex.y);
    let vec_c = (point_c.x - vertex.x, point_c.y - vertex.y);

    let dot_product = vec_a.0 * vec_c.0 + vec_a.1 * vec_c.1;
    let mag_a = (vec_a.0 * vec_a.0 + vec_a.1 * vec_a.1).sqrt();
    let mag_c = (vec_c.0 * vec_c.0 + vec_c.1 * vec_c.1).sqrt();

    if !dot_product.is_finite() || !mag_a.is_finite() || !mag_c.is_finite() {
        return Err(FrameError::NonFinite("joint angle"));
    }
    if mag_a == 0.0 || mag_c == 0.0 {
        return Err(FrameError::DegenerateVector("joint angle"));
    }

    let cos_angle = dot_product / (mag_a * mag_c + ANGLE_EPSILON);
    Ok(cos_angle.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Angle at joint `b` formed by joints `a` and `c` of a frame
pub fn landmark_angle(
    frame: &LandmarkFrame,
    a: Joint,
    b: Joint,
    c: Joint,
) -> Result<f64, FrameError> {
    joint_angle(
        frame.require(a)?.point(),
        frame.require(b)?.point(),
        frame.require(c)?.point(),
    )
}

/// Midpoint of two joints
pub fn joint_midpoint(frame: &LandmarkFrame, left: Joint, right: Joint) -> Result<Point, FrameError> {
    let point = Point::midpoint(frame.require(left)?.point(), frame.require(right)?.point());
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(FrameError::NonFinite("joint midpoint"));
    }
    Ok(point)
}

/// Mean vertical position of a left/right joint pair
pub fn mean_height(frame: &LandmarkFrame, left: Joint, right: Joint) -> Result<f64, FrameError> {
    Ok(joint_midpoint(frame, left, right)?.y)
}

/// Mean depth of a left/right joint pair
pub fn mean_depth(frame: &LandmarkFrame, left: Joint, right: Joint) -> Result<f64, FrameError> {
    let depth = (frame.require(left)?.z + frame.require(right)?.z) / 2.0;
    if !depth.is_finite() {
        return Err(FrameError::NonFinite("joint depth"));
    }
    Ok(depth)
}

/// Mean of a set of visibility values; `None` when empty
pub fn mean_visibility(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Mean visibility over `joints`, requiring all of them
pub fn required_mean_visibility(frame: &LandmarkFrame, joints: &[Joint]) -> Result<f64, FrameError> {
    let values = joints
        .iter()
        .map(|joint| frame.require(*joint).map(|lm| lm.visibility))
        .collect::<Result<Vec<_>, _>>()?;
    let mean = mean_visibility(&values).ok_or(FrameError::NonFinite("visibility"))?;
    if !mean.is_finite() {
        return Err(FrameError::NonFinite("visibility"));
    }
    Ok(mean)
}

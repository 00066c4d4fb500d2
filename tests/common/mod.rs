#![allow(dead_code)]

use std::sync::Once;

use volley_coach::models::{Joint, Landmark, LandmarkFrame};

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Textbook forearm pass: straight arms joined just below the hips, knees near 104 degrees
pub fn ready_position() -> LandmarkFrame {
    ready_position_with_visibility(0.95)
}

pub fn ready_position_with_visibility(visibility: f64) -> LandmarkFrame {
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
    .map(|(joint, x, y, z)| (joint, Landmark::new(x, y, z, visibility)))
    .collect()
}

/// Copy of `frame` with one joint replaced
pub fn with_landmark(frame: &LandmarkFrame, joint: Joint, landmark: Landmark) -> LandmarkFrame {
    frame
        .iter()
        .map(|(j, l)| (*j, *l))
        .chain(std::iter::once((joint, landmark)))
        .collect()
}

/// Copy of `frame` without one joint
pub fn without(frame: &LandmarkFrame, joint: Joint) -> LandmarkFrame {
    frame
        .iter()
        .filter(|(j, _)| **j != joint)
        .map(|(j, l)| (*j, *l))
        .collect()
}

/// Copy of `frame` with every joint shifted vertically
pub fn shifted(frame: &LandmarkFrame, dy: f64) -> LandmarkFrame {
    frame
        .iter()
        .map(|(j, l)| (*j, Landmark::new(l.x, l.y + dy, l.z, l.visibility)))
        .collect()
}

/// A bump: the whole body dips and rises smoothly over `n` frames
pub fn bump_sequence(n: usize) -> Vec<Option<LandmarkFrame>> {
    let base = ready_position();
    (0..n)
        .map(|i| {
            let phase = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            Some(shifted(&base, 0.04 * (std::f64::consts::PI * phase).sin()))
        })
        .collect()
}

//! Landmark input files
//!
//! A sequence file is a JSON array of frames, `null` marking a frame in which
//! no body was detected. An object with a `frames` field (the HTTP request
//! body) is accepted too. A frame file is a single landmark object.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use volley_coach::models::LandmarkFrame;

#[derive(Deserialize)]
#[serde(untagged)]
enum SequenceFile {
    Frames(Vec<Option<LandmarkFrame>>),
    Request { frames: Vec<Option<LandmarkFrame>> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameFile {
    Sequence(SequenceFile),
    Single(LandmarkFrame),
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse a sequence document
pub fn parse_sequence(contents: &str) -> Result<Vec<Option<LandmarkFrame>>> {
    let file: SequenceFile =
        serde_json::from_str(contents).context("Expected a JSON array of landmark frames")?;
    Ok(match file {
        SequenceFile::Frames(frames) | SequenceFile::Request { frames } => frames,
    })
}

/// Load every frame of a sequence file
pub fn read_sequence(path: &Path) -> Result<Vec<Option<LandmarkFrame>>> {
    parse_sequence(&read(path)?).with_context(|| format!("Invalid sequence file {}", path.display()))
}

/// Parse a frame document; `index` selects a frame when the document is a sequence
pub fn parse_frame(contents: &str, index: Option<usize>) -> Result<Option<LandmarkFrame>> {
    let file: FrameFile = serde_json::from_str(contents)
        .context("Expected a landmark frame or a JSON array of frames")?;

    match file {
        FrameFile::Single(frame) => {
            if index.is_some_and(|i| i > 0) {
                bail!("Frame index given but the file holds a single frame");
            }
            Ok(Some(frame))
        }
        FrameFile::Sequence(SequenceFile::Frames(frames))
        | FrameFile::Sequence(SequenceFile::Request { frames }) => {
            let index = index.unwrap_or(0);
            let count = frames.len();
            frames
                .into_iter()
                .nth(index)
                .with_context(|| format!("Frame index {} out of range ({} frames)", index, count))
        }
    }
}

/// Load one frame from a frame or sequence file
pub fn read_frame(path: &Path, index: Option<usize>) -> Result<Option<LandmarkFrame>> {
    parse_frame(&read(path)?, index).with_context(|| format!("Invalid frame file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_coach::models::Joint;

    const FRAME: &str = r#"{"left_wrist": {"x": 0.4, "y": 0.5, "z": 0.0, "visibility": 0.9}}"#;

    #[test]
    fn test_parse_sequence_array() {
        let frames = parse_sequence(&format!("[{}, null, {}]", FRAME, FRAME)).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].is_none());
        assert!(frames[0].as_ref().unwrap().contains(Joint::LeftWrist));
    }

    #[test]
    fn test_parse_sequence_request_body() {
        let frames = parse_sequence(&format!(r#"{{"frames": [{}], "mode": "sequence"}}"#, FRAME))
            .unwrap();
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_parse_sequence_rejects_garbage() {
        assert!(parse_sequence("{\"x\": 1}").is_err());
        assert!(parse_sequence("not json").is_err());
    }

    #[test]
    fn test_parse_single_frame() {
        let frame = parse_frame(FRAME, None).unwrap().unwrap();
        assert_eq!(frame.len(), 1);
        assert!(parse_frame(FRAME, Some(2)).is_err());
    }

    #[test]
    fn test_parse_frame_from_sequence() {
        let contents = format!("[null, {}]", FRAME);
        assert!(parse_frame(&contents, None).unwrap().is_none());
        assert!(parse_frame(&contents, Some(1)).unwrap().is_some());
        assert!(parse_frame(&contents, Some(5)).is_err());
    }
}

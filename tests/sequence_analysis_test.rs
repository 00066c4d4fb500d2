mod common;

use std::io::Write;

use pretty_assertions::assert_eq;
use volley_coach::config::{AppConfig, ScoringConfig, ScoringProfile};
use volley_coach::models::{AggregationMode, FeedbackKind, Grade, Joint, Landmark, LandmarkFrame};
use volley_coach::services::sequence_analysis_service::NEUTRAL_METRIC;
use volley_coach::PoseAnalysisService;

use common::{bump_sequence, init_test_logging, ready_position, shifted, with_landmark};

fn service() -> PoseAnalysisService {
    PoseAnalysisService::new(ScoringConfig::default()).unwrap()
}

#[test]
fn test_smooth_bump_grades_well() {
    init_test_logging();
    let frames = bump_sequence(15);
    let result = service().analyze_sequence(&frames);

    assert_eq!(result.total_frames, 15);
    assert_eq!(result.valid_frames, 15);
    assert_eq!(result.frame_scores.len(), 15);
    assert!(result.sequence_metrics.smoothness > 95.0);
    assert!((result.sequence_metrics.completeness - 97.5).abs() < 1e-6);
    assert!((result.sequence_metrics.consistency - 100.0).abs() < 1e-6);
    assert!(result.combined_score >= 85, "combined {}", result.combined_score);
    assert_eq!(result.grade.grade, Grade::S);
    assert!(result.level.passed);

    let best = result.frame_scores[result.best_frame_index];
    assert!(result.frame_scores.iter().all(|total| *total <= best));
}

#[test]
fn test_representative_mode_prefers_the_middle_frame() {
    let frames = bump_sequence(15);
    let result = service().analyze_representative(&frames);

    assert_eq!(result.mode, AggregationMode::Representative);
    assert_eq!(result.sequence_metrics.representative_frame_index, 7);
    assert_eq!(result.best_frame_index, 7);

    // frame * 0.6 + sequence aggregate * 0.4
    let expected = f64::from(result.best_frame_score.total) * 0.6 + result.sequence_score * 0.4;
    assert_eq!(result.combined_score, expected as u32);
}

#[test]
fn test_jerky_motion_is_penalized() {
    let base = ready_position();
    let frames: Vec<Option<LandmarkFrame>> = [0.0, 0.01, 0.15, 0.16, 0.4]
        .iter()
        .map(|dy| Some(shifted(&base, *dy)))
        .collect();

    let smooth = service().analyze_sequence(&bump_sequence(5));
    let jerky = service().analyze_sequence(&frames);

    assert!(jerky.sequence_metrics.smoothness < 80.0);
    assert!(jerky.combined_score < smooth.combined_score);
    assert!(jerky
        .feedback
        .iter()
        .any(|line| line.kind == FeedbackKind::Correction && line.message.contains("not smooth")));
}

#[test]
fn test_no_body_anywhere() {
    let frames: Vec<Option<LandmarkFrame>> = vec![None; 6];
    let result = service().analyze_sequence(&frames);

    assert_eq!(result.sequence_metrics.completeness, 0.0);
    assert_eq!(result.sequence_metrics.smoothness, NEUTRAL_METRIC);
    assert_eq!(result.best_frame_index, 0);
    assert_eq!(result.frame_scores, vec![0; 6]);
    assert_eq!(result.valid_frames, 0);
    // 0 * 0.6 + 50 * 0.25 + 0 * 0.15
    assert_eq!(result.combined_score, 12);
    assert_eq!(result.grade.grade, Grade::D);
}

#[test]
fn test_empty_sequence_scores_zero() {
    let result = service().analyze_sequence(&[]);

    assert_eq!(result.combined_score, 0);
    assert_eq!(result.total_frames, 0);
    assert!(result
        .feedback
        .iter()
        .any(|line| line.message == "No valid motion sequence detected"));
}

#[test]
fn test_single_frame_uses_neutral_metrics() {
    let result = service().analyze_sequence(&[Some(ready_position())]);

    assert_eq!(result.sequence_metrics.smoothness, NEUTRAL_METRIC);
    assert_eq!(result.sequence_metrics.consistency, NEUTRAL_METRIC);
    assert_eq!(result.best_frame_index, 0);
}

#[test]
fn test_gaps_keep_trajectories_aligned() {
    let mut frames = bump_sequence(8);
    frames[2] = None;
    frames[5] = Some(with_landmark(
        &ready_position(),
        Joint::LeftWrist,
        Landmark::new(f64::NAN, f64::NAN, 0.0, 0.0),
    ));

    let result = service().analyze_sequence(&frames);
    for trajectory in result.sequence_metrics.trajectories.values() {
        assert_eq!(trajectory.x.len(), 8);
        assert_eq!(trajectory.visibility.len(), 8);
    }
    assert_eq!(result.frame_scores[2], 0);
    assert_eq!(result.valid_frames, 7);
}

#[tokio::test]
async fn test_concurrent_analysis_matches_sequential() {
    let frames = bump_sequence(20);
    let service = service();

    let sequential = service.analyze_representative(&frames);
    let concurrent = service
        .analyze_sequence_concurrent(frames, AggregationMode::Representative)
        .await
        .unwrap();

    assert_eq!(sequential, concurrent);
}

#[test]
fn test_strict_profile_end_to_end() {
    let service =
        PoseAnalysisService::new(ScoringConfig::for_profile(ScoringProfile::Strict)).unwrap();
    let result = service.analyze_sequence(&bump_sequence(10));

    assert_eq!(service.profile(), ScoringProfile::Strict);
    assert!(result.best_frame_score.arm <= 40.0);
    assert!(result.best_frame_score.position <= 20.0);
    assert!(result.breakdown.arm <= 100.0);
}

#[test]
fn test_scoring_config_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
profile = "strict"

[grades]
s = 95.0
a = 80.0
b = 70.0
c = 60.0
"#
    )
    .unwrap();

    let app = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        scoring_config_path: Some(file.path().display().to_string()),
        scoring_profile: Some(ScoringProfile::Tolerant),
    };

    let config = app.scoring_config().unwrap();
    assert_eq!(config.profile, ScoringProfile::Tolerant);
    assert_eq!(config.grade_thresholds().s, 95.0);

    let service = PoseAnalysisService::new(config).unwrap();
    assert_eq!(service.aggregator().grade(90.0), Grade::A);
}

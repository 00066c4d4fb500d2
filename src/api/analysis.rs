use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::config::ScoringConfig;
use crate::models::{AggregationMode, CombinedResult, FrameAnalysis, LandmarkFrame, ScoreCombination};
use crate::services::PoseAnalysisService;

#[derive(Debug, Deserialize)]
pub struct FrameAnalysisRequest {
    /// `null` when no body was detected
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SequenceAnalysisRequest {
    #[validate(length(min = 1, max = 10000, message = "A sequence must contain between 1 and 10000 frames"))]
    pub frames: Vec<Option<LandmarkFrame>>,
    #[serde(default)]
    pub mode: AggregationMode,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CombineScoresRequest {
    #[validate(range(min = 0.0, max = 100.0, message = "Frame score must be between 0 and 100"))]
    pub frame_score: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Sequence score must be between 0 and 100"))]
    pub sequence_score: f64,
}

#[derive(Debug, Serialize)]
pub struct SequenceAnalysisResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: CombinedResult,
}

/// Analysis API errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid request body: {0}")]
    Payload(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Analysis failed")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AnalysisError::Payload(rejection) => {
                (rejection.status(), "invalid_payload", rejection.body_text())
            }
            AnalysisError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, "validation_error", errors.to_string())
            }
            AnalysisError::Internal(err) => {
                error!("Analysis failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Analysis failed".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}

/// Score a single frame
pub async fn analyze_frame(
    State(service): State<PoseAnalysisService>,
    WithRejection(Json(request), _): WithRejection<Json<FrameAnalysisRequest>, AnalysisError>,
) -> Result<Json<FrameAnalysis>, AnalysisError> {
    Ok(Json(service.analyze_frame(request.landmarks.as_ref())))
}

/// Score a whole sequence
pub async fn analyze_sequence(
    State(service): State<PoseAnalysisService>,
    WithRejection(Json(request), _): WithRejection<Json<SequenceAnalysisRequest>, AnalysisError>,
) -> Result<Json<SequenceAnalysisResponse>, AnalysisError> {
    request.validate()?;

    let analysis_id = Uuid::new_v4();
    info!(
        "Sequence analysis {} requested: {} frames, {:?} mode",
        analysis_id,
        request.frames.len(),
        request.mode
    );

    let result = service
        .analyze_sequence_concurrent(request.frames, request.mode)
        .await?;

    Ok(Json(SequenceAnalysisResponse {
        analysis_id,
        analyzed_at: Utc::now(),
        result,
    }))
}

/// Blend a frame score with a sequence aggregate computed by the caller
pub async fn combine_scores(
    State(service): State<PoseAnalysisService>,
    WithRejection(Json(request), _): WithRejection<Json<CombineScoresRequest>, AnalysisError>,
) -> Result<Json<ScoreCombination>, AnalysisError> {
    request.validate()?;
    Ok(Json(
        service.combine_scores(request.frame_score, request.sequence_score),
    ))
}

/// Active scoring configuration
pub async fn get_config(State(service): State<PoseAnalysisService>) -> Json<ScoringConfig> {
    Json(service.config().clone())
}

/// Create analysis API routes
pub fn analysis_routes() -> Router<PoseAnalysisService> {
    Router::new()
        .route("/frame", post(analyze_frame))
        .route("/sequence", post(analyze_sequence))
        .route("/combine", post(combine_scores))
}

use crate::{
    analysis::{AnalysisStatus, AnalysisView, Outcome},
    server::SharedState,
    upload::{ImageUpload, TransientImage, UploadError},
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_client::InferenceError;
use serde_json::json;
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Failed to read stored image: {0}")]
    StoredImage(InferenceError),
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = match &self {
            AnalyzeError::Upload(UploadError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AnalyzeError::Upload(UploadError::Multipart(e)) => e.status(),
            AnalyzeError::Upload(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::StoredImage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Analysis failed: {}", self);
        } else {
            tracing::warn!("Rejected upload: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[instrument(skip(state, multipart))]
pub async fn analyze(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Response, AnalyzeError> {
    let upload = ImageUpload::from_multipart(multipart).await?;
    state.metrics.record_upload(&upload.extension);

    let transient = TransientImage::persist(&state.upload_dir, &upload).await?;

    let started = Instant::now();
    let detection = state.detector.detect(transient.path(), &state.model_id).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    transient.release();

    let (outcome, raw_response) = match detection {
        Ok(result) => (Outcome::from_result(&result), result.raw),
        Err(e) if e.is_remote() => {
            tracing::error!("Inference service call failed: {}", e);
            let raw = json!({ "error": e.to_string() });
            (Outcome::ServiceUnavailable, raw)
        }
        Err(e) => return Err(AnalyzeError::StoredImage(e)),
    };

    let status = outcome.status();
    state.metrics.record_inference_duration(elapsed_ms, status);
    state.metrics.record_outcome(status);
    tracing::info!(
        "Analyzed {} in {}ms: {}",
        upload.file_name,
        elapsed_ms,
        status.as_str()
    );

    let http_status = match status {
        AnalysisStatus::ServiceUnavailable => StatusCode::BAD_GATEWAY,
        AnalysisStatus::Detected | AnalysisStatus::NoDetection => StatusCode::OK,
    };
    let view = AnalysisView::render(&outcome, raw_response);

    Ok((http_status, Json(view)).into_response())
}

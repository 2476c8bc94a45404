use crate::{ClientConfig, DetectionResult, InferenceError, ModelId};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, Client};
use serde_json::Value;
use std::path::Path;
use tracing::instrument;

/// Anything that can turn an image on disk into detections.
#[async_trait]
pub trait Detector: Send + Sync + 'static {
    async fn detect(
        &self,
        image_path: &Path,
        model_id: &ModelId,
    ) -> Result<DetectionResult, InferenceError>;
}

/// Client for a hosted object-detection API.
///
/// Images are posted base64 encoded as a form body to
/// `{api_url}/{project}/{version}?api_key=...`. Each call is independent:
/// there is no caching and no retry.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: Client,
    config: ClientConfig,
}

impl InferenceClient {
    pub fn new(config: ClientConfig) -> Result<Self, InferenceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InferenceError::ClientBuild)?;

        Ok(Self { http, config })
    }

    #[instrument(skip(self, image))]
    pub async fn infer_bytes(
        &self,
        image: &[u8],
        model_id: &ModelId,
    ) -> Result<DetectionResult, InferenceError> {
        let url = format!(
            "{}/{}/{}",
            self.config.base_url(),
            model_id.project(),
            model_id.version()
        );
        tracing::debug!("Posting {} bytes to {}", image.len(), url);

        let response = self
            .http
            .post(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(STANDARD.encode(image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let raw: Value = serde_json::from_slice(&bytes)?;
        let result = DetectionResult::from_json(raw)?;

        tracing::debug!("Received {} predictions", result.predictions.len());
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn infer_path(
        &self,
        image_path: &Path,
        model_id: &ModelId,
    ) -> Result<DetectionResult, InferenceError> {
        let image = tokio::fs::read(image_path)
            .await
            .map_err(|source| InferenceError::ReadImage {
                path: image_path.to_path_buf(),
                source,
            })?;

        self.infer_bytes(&image, model_id).await
    }
}

#[async_trait]
impl Detector for InferenceClient {
    async fn detect(
        &self,
        image_path: &Path,
        model_id: &ModelId,
    ) -> Result<DetectionResult, InferenceError> {
        self.infer_path(image_path, model_id).await
    }
}

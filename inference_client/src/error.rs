use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Failed to read image {path:?}: {source}")]
    ReadImage {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to build http client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Request to inference service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Inference service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Failed to decode inference response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl InferenceError {
    /// True when the fault sits on the remote side of the call rather than
    /// in reading the local image.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            InferenceError::Transport(_)
                | InferenceError::Status { .. }
                | InferenceError::Decode(_)
        )
    }
}

mod client;
mod config;
mod detection;
mod error;
mod model_id;

pub use client::{Detector, InferenceClient};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use detection::{DetectionResult, Prediction};
pub use error::InferenceError;
pub use model_id::{ModelId, ModelIdError};

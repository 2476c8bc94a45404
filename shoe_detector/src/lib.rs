mod routes;
mod upload;

pub mod analysis;
pub mod app;
pub mod config;
pub mod server;
pub mod telemetry;

pub use app::start_app;
pub use routes::AnalyzeError;
pub use upload::{ImageUpload, TransientImage, UploadError};

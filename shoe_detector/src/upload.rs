use axum::extract::{multipart::MultipartError, Multipart};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const IMAGE_FIELD: &str = "image";
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to read multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("No `image` file was uploaded")]
    MissingImage,
    #[error("The uploaded image is empty")]
    EmptyImage,
    #[error("Unsupported file `{0}`. Upload a jpg, jpeg or png image.")]
    UnsupportedExtension(String),
    #[error("Failed to store uploaded image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub extension: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(file_name: &str, bytes: Bytes) -> Result<Self, UploadError> {
        let extension = accepted_extension(file_name)
            .ok_or_else(|| UploadError::UnsupportedExtension(file_name.to_string()))?;
        if bytes.is_empty() {
            return Err(UploadError::EmptyImage);
        }

        Ok(Self {
            file_name: file_name.to_string(),
            extension,
            bytes,
        })
    }

    /// Takes the first file field named `image`. Unnamed file fields are
    /// accepted too; files under any other name are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, UploadError> {
        while let Some(field) = multipart.next_field().await? {
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            if field.name().is_some_and(|name| name != IMAGE_FIELD) {
                continue;
            }
            let bytes = field.bytes().await?;
            return Self::new(&file_name, bytes);
        }

        Err(UploadError::MissingImage)
    }
}

fn accepted_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    ACCEPTED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// On-disk copy of one upload. The file is removed when this value is
/// released or dropped, whichever comes first.
#[derive(Debug)]
pub struct TransientImage {
    file: NamedTempFile,
}

impl TransientImage {
    pub async fn persist(dir: &Path, upload: &ImageUpload) -> Result<Self, UploadError> {
        tokio::fs::create_dir_all(dir).await?;

        let file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", upload.extension))
            .tempfile_in(dir)?;
        tokio::fs::write(file.path(), &upload.bytes).await?;

        tracing::debug!(
            "Stored {} ({} bytes) at {:?}",
            upload.file_name,
            upload.bytes.len(),
            file.path()
        );
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Best effort; a failed removal is logged and otherwise ignored.
    pub fn release(self) -> PathBuf {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::debug!("Failed to remove transient image {:?}: {}", path, e);
        }
        path
    }
}

//! Single-file multipart upload.
//!
//! [`UploadFile`] pulls one named field out of a multipart body and writes it
//! to the upload directory under a fresh UUID v4 name, keeping an extension
//! derived from the declared MIME type. [`Upload`] wires that into a handler
//! argument, with the field name chosen by a marker type.
//!
//! Image routes lift axum's 2 MB default body limit with [`upload_body_limit`].
//! A body over the limit is answered with 413 Payload Too Large.

use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request};
use uuid::Uuid;

use crate::{app::AppState, error::AppError};

/// URL prefix under which the upload directory is served.
pub const UPLOAD_URL_PREFIX: &str = "/upload";

/// Largest request body accepted on an upload route (50 MiB).
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Body limit layer for routes taking an [`Upload`].
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_UPLOAD_SIZE)
}

/// A file written to disk by [`UploadFile`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    /// Generated name, e.g. `4f0c...e1.png`
    pub file_name: String,

    /// Location on disk
    pub path: PathBuf,
}

impl StoredFile {
    /// Public URL path of the file, e.g. `/upload/4f0c...e1.png`.
    pub fn url_path(&self) -> String {
        format!("{}/{}", UPLOAD_URL_PREFIX, self.file_name)
    }

    /// Delete the file from disk. Failures are logged, not returned.
    pub async fn remove(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!("Failed to remove upload {}: {}", self.file_name, e);
        }
    }

    /// Pass `result` through, removing the file first when it is an error.
    ///
    /// Used once the file is on disk but the record it belongs to could not
    /// be updated.
    pub async fn discard_on_error<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if result.is_err() {
            self.remove().await;
        }
        result
    }
}

/// Generate a collision-free file name for content of the given MIME type.
pub fn generate_file_name(content_type: &str) -> String {
    let extension = mime_guess::get_mime_extensions_str(content_type)
        .and_then(|extensions| extensions.first().copied())
        .unwrap_or("bin");

    format!("{}.{}", Uuid::new_v4().simple(), extension)
}

/// Write `bytes` into `directory` under a generated name.
pub async fn write_file(
    directory: &Path,
    content_type: &str,
    bytes: &[u8],
) -> Result<StoredFile, AppError> {
    tokio::fs::create_dir_all(directory).await?;

    let file_name = generate_file_name(content_type);
    let path = directory.join(&file_name);
    tokio::fs::write(&path, bytes).await?;

    tracing::info!("Stored upload {} ({} bytes)", file_name, bytes.len());

    Ok(StoredFile { file_name, path })
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    directory: PathBuf,
    field_name: &'static str,
}

impl UploadFile {
    pub fn new(directory: impl Into<PathBuf>, field_name: &'static str) -> Self {
        Self {
            directory: directory.into(),
            field_name,
        }
    }

    /// Store the first field called `field_name`; other fields are skipped.
    ///
    /// # Errors
    ///
    /// - 400 if the body is not valid multipart or the field is absent
    /// - 413 if the body exceeds the route's body limit
    /// - `Storage` if the file cannot be written
    pub async fn store(&self, mut multipart: Multipart) -> Result<StoredFile, AppError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::http(e.status(), e.body_text(), "upload_file"))?
        {
            if field.name() != Some(self.field_name) {
                continue;
            }

            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::http(e.status(), e.body_text(), "upload_file"))?;

            return write_file(&self.directory, &content_type, &bytes).await;
        }

        Err(AppError::bad_request(
            format!("Missing file field {}", self.field_name),
            "upload_file",
        ))
    }
}

/// Names the multipart field an [`Upload`] reads.
pub trait UploadField: Send + Sync + 'static {
    const NAME: &'static str;
}

pub struct AvatarField;
pub struct PosterField;
pub struct BackgroundField;

impl UploadField for AvatarField {
    const NAME: &'static str = "avatar";
}

impl UploadField for PosterField {
    const NAME: &'static str = "poster";
}

impl UploadField for BackgroundField {
    const NAME: &'static str = "background";
}

/// Handler argument: the file uploaded in field `F::NAME`, already on disk.
pub struct Upload<F> {
    pub file: StoredFile,
    field: PhantomData<F>,
}

impl<F: UploadField> FromRequest<AppState> for Upload<F> {
    type Rejection = AppError;

    async fn from_request(request: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| {
                AppError::http(rejection.status(), rejection.body_text(), "upload_file")
            })?;

        let file = UploadFile::new(&state.config.upload_directory, F::NAME)
            .store(multipart)
            .await?;

        Ok(Upload {
            file,
            field: PhantomData,
        })
    }
}

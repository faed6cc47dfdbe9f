use super::{
    sanitize::{ALLOWED_EXTENSIONS, extension, is_allowed, media_type_for, sanitize_filename},
    storage::UploadStorage,
};
use crate::{Error, Result};
use axum::body::Bytes;
use std::{path::PathBuf, sync::Arc};
use tracing::info;

/// An uploaded image that passed validation and was written to storage.
#[derive(Debug, Clone)]
pub struct StagedAttachment {
    pub stored_path: PathBuf,
    pub sanitized_name: String,
    pub media_type: String,
    pub data: Bytes,
}

#[derive(Clone)]
pub struct UploadStager {
    storage: Arc<dyn UploadStorage>,
}

impl UploadStager {
    pub fn new(storage: Arc<dyn UploadStorage>) -> Self {
        Self { storage }
    }

    /// Validates and persists one attachment. Nothing reaches storage unless
    /// the sanitized name carries an allowed image extension.
    pub async fn stage(
        &self,
        filename: &str,
        declared_media_type: Option<&str>,
        data: Bytes,
    ) -> Result<StagedAttachment> {
        if filename.trim().is_empty() {
            return Err(Error::invalid_attachment("empty filename"));
        }

        let sanitized_name = sanitize_filename(filename);
        let ext = match extension(&sanitized_name) {
            Some(ext) if is_allowed(&sanitized_name) => ext,
            _ => {
                return Err(Error::invalid_attachment(format!(
                    "'{}' does not have one of the extensions {:?}",
                    filename, ALLOWED_EXTENSIONS
                )));
            }
        };

        let media_type = resolve_media_type(declared_media_type, &ext);
        let stored_path = self.storage.write(&sanitized_name, &data).await?;

        info!(
            "Staged upload '{}' as {} ({}, {} bytes)",
            filename,
            stored_path.display(),
            media_type,
            data.len()
        );

        Ok(StagedAttachment {
            stored_path,
            sanitized_name,
            media_type,
            data,
        })
    }
}

/// Trusts the client's content type only when it names an image.
fn resolve_media_type(declared: Option<&str>, ext: &str) -> String {
    match declared.map(str::trim) {
        Some(declared) if declared.to_ascii_lowercase().starts_with("image/") => {
            declared.to_string()
        }
        _ => media_type_for(ext)
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}

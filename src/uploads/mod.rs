use crate::config::UploadConfig;
use crate::error::Error;
use anyhow::Result;
use std::path::Path;
use tracing::warn;
use uuid::Uuid;

/// An uploaded file handed in by the request layer
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Blob store contract: save a file, get back a stable reference.
/// Deletion is best-effort cleanup, not part of any transaction.
pub trait BlobStore: Send + Sync {
    fn save(&self, upload: &Upload) -> Result<String>;
    fn delete(&self, reference: &str) -> bool;
}

/// Filesystem-backed blob store writing `{uuid}{ext}` files
pub struct FsBlobStore {
    config: UploadConfig,
}

impl FsBlobStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    fn extension_of(filename: &str) -> Option<String> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
    }
}

impl BlobStore for FsBlobStore {
    fn save(&self, upload: &Upload) -> Result<String> {
        let extension = Self::extension_of(&upload.filename).ok_or_else(|| {
            Error::Dependency(format!("File has no extension: {}", upload.filename))
        })?;

        if !self.config.allowed_extensions.contains(&extension) {
            return Err(Error::Dependency(format!(
                "File type not allowed: {}. Allowed types: {}",
                extension,
                self.config.allowed_extensions.join(", ")
            ))
            .into());
        }

        if upload.bytes.len() > self.config.max_file_size {
            return Err(Error::Dependency(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_file_size
            ))
            .into());
        }

        std::fs::create_dir_all(&self.config.directory)
            .map_err(|e| Error::Dependency(format!("Could not create upload dir: {}", e)))?;

        let path = self
            .config
            .directory
            .join(format!("{}{}", Uuid::new_v4(), extension));

        if let Err(e) = std::fs::write(&path, &upload.bytes) {
            // Partial writes are removed so no orphan file remains
            let _ = std::fs::remove_file(&path);
            return Err(Error::Dependency(format!("Could not save file: {}", e)).into());
        }

        Ok(path.to_string_lossy().into_owned())
    }

    fn delete(&self, reference: &str) -> bool {
        match std::fs::remove_file(reference) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not delete blob {}: {}", reference, e);
                false
            }
        }
    }
}

/// In-memory blob store used by tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryBlobStore {
    saved: std::sync::Mutex<Vec<String>>,
    /// Uploads whose filename contains this marker fail to save
    fail_marker: Option<String>,
    deleted: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl BlobStore for MemoryBlobStore {
    fn save(&self, upload: &Upload) -> Result<String> {
        if let Some(marker) = &self.fail_marker {
            if upload.filename.contains(marker.as_str()) {
                return Err(
                    Error::Dependency(format!("Upload rejected: {}", upload.filename)).into(),
                );
            }
        }
        let reference = format!("uploads/{}-{}", Uuid::new_v4(), upload.filename);
        self.saved.lock().unwrap().push(reference.clone());
        Ok(reference)
    }

    fn delete(&self, reference: &str) -> bool {
        self.deleted.lock().unwrap().push(reference.to_string());
        true
    }
}

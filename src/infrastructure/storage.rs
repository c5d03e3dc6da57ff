use crate::domain::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// A file written to the resource store.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Path relative to the storage root, always using `/`.
    pub relative_path: String,
    pub sha256: String,
    pub size_bytes: i64,
}

/// Binary file storage rooted at a local directory.
///
/// Files are laid out as `resources/{user_id}/{unix_millis}_{file_name}` so a
/// user's uploads never collide with another user's.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root.join("resources")).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save(&self, user_id: &str, file_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        let user_segment = sanitize_segment(user_id);
        if user_segment.is_empty() {
            return Err(AppError::ValidationError("Invalid user id".to_string()));
        }
        let stamp = chrono::Utc::now().timestamp_millis();
        let relative_path = format!(
            "resources/{}/{}_{}",
            user_segment,
            stamp,
            sanitize_file_name(file_name)
        );

        let full_path = self.resolve(&relative_path)?;
        if let Some(parent) = full_path.parent() {
            ensure_dir(parent).await?;
        }
        fs::write(&full_path, bytes)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to write file: {}", e)))?;

        Ok(StoredFile {
            relative_path,
            sha256: hex::encode(Sha256::digest(bytes)),
            size_bytes: bytes.len() as i64,
        })
    }

    pub async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(relative_path)?;
        fs::read(&full_path)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to read file: {}", e)))
    }

    /// Removes a stored file. Missing files are not an error.
    pub async fn delete(&self, relative_path: &str) -> Result<()> {
        let full_path = self.resolve(relative_path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StorageError(format!(
                "Failed to delete file: {}",
                e
            ))),
        }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let relative = Path::new(relative_path);
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if escapes {
            return Err(AppError::SecurityError(format!(
                "Path escapes storage root: {}",
                relative_path
            )));
        }
        Ok(self.root.join(relative))
    }
}

fn sanitize_segment(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned
    }
}

async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| AppError::StorageError(format!("Failed to create {}: {}", path.display(), e)))
}

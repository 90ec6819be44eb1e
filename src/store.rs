//! Disk-backed store for uploaded data files.
//!
//! The data directory is used as a key-value store of raw file bytes: a file
//! is either present or absent, nothing else. Only tabular extensions are
//! accepted on upload or reported by list().

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tracing::info;

use crate::types::{AppError, AppResult};

const ALLOWED_EXTENSIONS: [&str; 3] = [".csv", ".xlsx", ".xls"];

#[derive(Debug, Clone, serde::Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub async fn ensure_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    /// Store an uploaded file. Rejects unsupported extensions and any name
    /// that could escape the data directory.
    pub async fn save(&self, filename: &str, data: Bytes) -> AppResult<()> {
        if filename.is_empty() {
            return Err(AppError::InvalidRequest("No file selected".to_string()));
        }
        validate_name(filename)?;
        if !has_allowed_extension(filename) {
            return Err(AppError::InvalidRequest(format!(
                "Invalid file type: {} (expected .csv, .xlsx or .xls)",
                filename
            )));
        }

        self.ensure_dir().await?;
        let path = self.data_dir.join(filename);
        fs::write(&path, &data).await?;
        info!(filename = %filename, size = data.len(), "Stored uploaded file");
        Ok(())
    }

    /// All stored tabular files, sorted by name. Anything else in the
    /// directory is ignored.
    pub async fn list(&self) -> AppResult<Vec<FileEntry>> {
        let mut entries = Vec::new();
        let mut dir = match fs::read_dir(&self.data_dir).await {
            Ok(dir) => dir,
            // Missing directory means nothing uploaded yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if !has_allowed_extension(&name) {
                continue;
            }
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            entries.push(FileEntry {
                name,
                size: meta.len(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Resolve a stored file by name, refusing traversal.
    pub async fn path_of(&self, filename: &str) -> AppResult<PathBuf> {
        validate_name(filename)?;
        let path = self.data_dir.join(filename);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(AppError::NotFound(format!("File not found: {}", filename))),
        }
    }
}

fn has_allowed_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::NotFound(format!("File not found: {}", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!("datalyst-test-{}", uuid::Uuid::new_v4()));
        FileStore::new(dir)
    }

    #[tokio::test]
    async fn test_save_and_list_sorted() {
        let store = temp_store();
        store
            .save("b.csv", Bytes::from_static(b"x\n1\n"))
            .await
            .unwrap();
        store
            .save("a.csv", Bytes::from_static(b"y\n2\n"))
            .await
            .unwrap();

        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.csv");
        assert_eq!(entries[1].name, "b.csv");
        assert_eq!(entries[0].size, 4);
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let store = temp_store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_bad_extension() {
        let store = temp_store();
        let err = store
            .save("script.py", Bytes::from_static(b"print(1)"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let store = temp_store();
        let err = store
            .save("../evil.csv", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = store.path_of("../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_path_of_missing_file() {
        let store = temp_store();
        store
            .save("present.csv", Bytes::from_static(b"x\n1\n"))
            .await
            .unwrap();
        assert!(store.path_of("present.csv").await.is_ok());
        let err = store.path_of("absent.csv").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_ignores_other_files() {
        let store = temp_store();
        store
            .save("data.csv", Bytes::from_static(b"x\n1\n"))
            .await
            .unwrap();
        tokio::fs::write(store.data_dir().join("notes.txt"), b"hello")
            .await
            .unwrap();
        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "data.csv");
    }
}

//! Storage locations and JSON helpers
//!
//! Settings live in the platform config directory, imported books in the
//! platform data directory.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, StorageError>;

fn project_dirs(app_name: &str) -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("co", "slowcomputer", app_name)
}

/// Get the config directory for an app
pub fn config_dir(app_name: &str) -> PathBuf {
    project_dirs(app_name)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the app-private data directory
pub fn data_dir(app_name: &str) -> PathBuf {
    project_dirs(app_name)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Directory holding one `.txt` file per imported book
pub fn books_dir(app_name: &str) -> PathBuf {
    data_dir(app_name).join("books")
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_round_trip_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut value = BTreeMap::new();
        value.insert("follow_system".to_string(), true);
        write_json(&path, &value).unwrap();

        let loaded: BTreeMap<String, bool> = read_json(&path).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = read_json::<BTreeMap<String, bool>>(&path).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(p) if p == path));
    }

    #[test]
    fn test_read_malformed_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json::<BTreeMap<String, bool>>(&path).unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn test_books_dir_under_data_dir() {
        let books = books_dir("ebookreader");
        assert!(books.ends_with("books"));
        assert_eq!(books.parent(), Some(data_dir("ebookreader").as_path()));
    }
}

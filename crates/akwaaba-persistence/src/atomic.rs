//! Crash-safe file primitives shared by every store.
//!
//! Documents are written to a temporary file in the target directory and
//! renamed into place, so a reader never observes a half-written document.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{PersistenceError, Result};

/// Creates `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::DirectoryError {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Writes `data` to `path` through a temp file and rename.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    ensure_dir(dir)?;

    let write_err = |source: std::io::Error| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp_file.write_all(data).map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|e| PersistenceError::WriteError {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// Serializes `value` as pretty JSON and writes it atomically.
pub fn atomic_write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

/// Reads and decodes a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|source| PersistenceError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Reads a JSON document, returning `None` when the file is absent.
pub fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

/// Removes a file; a missing file is not an error.
pub fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PersistenceError::RemoveError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads every `*.json` document directly under `dir`.
///
/// Documents that fail to decode are logged and skipped so one corrupt file
/// cannot take the whole collection offline. A missing directory is empty.
pub fn read_json_dir<T: DeserializeOwned>(dir: &Path, kind: &str) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| PersistenceError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut docs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PersistenceError::ReadError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        match read_json::<T>(&path) {
            Ok(doc) => docs.push(doc),
            Err(e) => warn!(kind, path = %path.display(), error = %e, "Skipping unreadable document"),
        }
    }

    debug!(kind, dir = %dir.display(), count = docs.len(), "Loaded documents");
    Ok(docs)
}

/// Lists the immediate subdirectories of `dir`.
pub fn subdirs(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| PersistenceError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PersistenceError::ReadError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

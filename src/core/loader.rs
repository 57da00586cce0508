//! Record loading utilities
//!
//! Generic helpers for moving records between the filesystem and memory,
//! reducing boilerplate in command implementations.

use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::store::RecordStore;

/// Load all records of type T from a directory
///
/// Scans the directory for .yaml files and deserializes them. Files that
/// fail to parse are silently skipped; `dlt validate` reports them.
pub fn load_all<T: DeserializeOwned + 'static>(dir: &Path) -> Result<Vec<T>> {
    let mut records = Vec::new();

    if !dir.exists() {
        return Ok(records);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .into_diagnostic()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |e| e == "yaml"))
        .collect();
    // Directory iteration order is platform-dependent; records sort by
    // filename so the store order is stable
    paths.sort();

    for path in paths {
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(record) = serde_yml::from_str::<T>(&content) {
                records.push(record);
            }
        }
    }

    Ok(records)
}

/// Load a directory of records into a store, ordered by filename
pub fn load_store<T: DeserializeOwned + 'static>(dir: &Path) -> Result<RecordStore<T>> {
    Ok(RecordStore::from_records(load_all(dir)?))
}

/// Find a record file by ID (supports partial matching)
///
/// Searches for a file whose stem contains the given ID. Returns the first
/// match found.
pub fn find_record_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.exists() {
        return None;
    }

    for entry in fs::read_dir(dir).ok()? {
        let entry = entry.ok()?;
        let path = entry.path();

        if path.extension().map_or(false, |e| e == "yaml") {
            let filename = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            if filename.contains(id) || filename.starts_with(id) {
                return Some(path);
            }
        }
    }

    None
}

/// Serialize a record to its YAML file, creating parent directories
pub fn save_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let contents = serde_yml::to_string(record).into_diagnostic()?;
    fs::write(path, contents).into_diagnostic()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_all_empty_dir() {
        let dir = tempdir().unwrap();
        let result: Result<Vec<serde_json::Value>> = load_all(dir.path());
        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_load_all_nonexistent_dir() {
        let result: Result<Vec<serde_json::Value>> = load_all(Path::new("/nonexistent/path"));
        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_load_all_sorts_by_filename() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("NX-000002.dlt.yaml"), "name: second").unwrap();
        fs::write(dir.path().join("NX-000001.dlt.yaml"), "name: first").unwrap();

        let records: Vec<serde_json::Value> = load_all(dir.path()).unwrap();
        assert_eq!(records[0]["name"], "first");
        assert_eq!(records[1]["name"], "second");
    }

    #[test]
    fn test_load_all_skips_unparsable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.dlt.yaml"), "name: ok").unwrap();
        fs::write(dir.path().join("bad.dlt.yaml"), "{ not: [ valid").unwrap();

        let records: Vec<serde_json::Value> = load_all(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_find_record_file_nonexistent() {
        let result = find_record_file(Path::new("/nonexistent/path"), "NX-001234");
        assert!(result.is_none());
    }

    #[test]
    fn test_find_record_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("NX-001234.dlt.yaml");
        fs::write(&file_path, "id: NX-001234").unwrap();

        let result = find_record_file(dir.path(), "NX-001234");
        assert!(result.is_some());
        assert_eq!(result.unwrap(), file_path);
    }

    #[test]
    fn test_save_record_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("devices/NX-000001.dlt.yaml");
        let record = serde_json::json!({ "id": "NX-000001" });

        save_record(&path, &record).unwrap();
        assert!(path.exists());
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("NX-000001"));
    }
}

//! Workspace discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::{RecordId, RecordPrefix};

/// Represents a DLT workspace
#[derive(Debug)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .dlt/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        loop {
            let dlt_dir = current.join(".dlt");
            if dlt_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new workspace structure at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let dlt_dir = root.join(".dlt");
        if dlt_dir.exists() {
            return Err(WorkspaceError::AlreadyExists(root.clone()));
        }

        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    /// Initialize even if .dlt/ already exists
    pub fn init_force(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    fn write_structure(root: &Path) -> Result<(), WorkspaceError> {
        let dlt_dir = root.join(".dlt");
        std::fs::create_dir_all(dlt_dir.join("schema"))
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        std::fs::create_dir_all(dlt_dir.join("templates"))
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        let config_path = dlt_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        Self::create_record_dirs(root)
    }

    fn default_config() -> &'static str {
        r#"# DLT Workspace Configuration

# Default author for registered records (can be overridden by global config)
# author: ""

# Editor to use for `dlt profile edit` (default: $EDITOR)
# editor: ""

# Default output format (table, yaml, json, csv, tsv, id)
# default_format: table
"#
    }

    fn create_record_dirs(root: &Path) -> Result<(), WorkspaceError> {
        let dirs = [
            "devices",
            "shipments",
            "recycling",
            "refurbishment",
            "profile",
        ];

        for dir in dirs {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .dlt configuration directory
    pub fn dlt_dir(&self) -> PathBuf {
        self.root.join(".dlt")
    }

    /// Get the path for a record file
    pub fn record_path(&self, id: &RecordId) -> PathBuf {
        let subdir = Self::record_directory(id.prefix());
        self.root.join(subdir).join(format!("{}.dlt.yaml", id))
    }

    /// Get the directory holding records of a given prefix
    pub fn record_directory(prefix: RecordPrefix) -> &'static str {
        match prefix {
            RecordPrefix::Device => "devices",
            RecordPrefix::Shipment => "shipments",
            RecordPrefix::Batch => "recycling",
            RecordPrefix::Job => "refurbishment",
            RecordPrefix::User => "profile",
        }
    }

    /// Absolute directory for records of a given prefix
    pub fn record_dir(&self, prefix: RecordPrefix) -> PathBuf {
        self.root.join(Self::record_directory(prefix))
    }

    /// The singleton profile file
    pub fn profile_path(&self) -> PathBuf {
        self.root.join("profile").join("profile.dlt.yaml")
    }

    /// Iterate all record files of a given prefix type
    pub fn iter_record_files(&self, prefix: RecordPrefix) -> impl Iterator<Item = PathBuf> {
        let dir = self.record_dir(prefix);
        walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(".dlt.yaml"))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not a DLT workspace (searched from {searched_from:?}). Run 'dlt init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("DLT workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();

        assert!(ws.dlt_dir().exists());
        assert!(ws.dlt_dir().join("config.yaml").exists());
        assert!(ws.dlt_dir().join("schema").is_dir());
        assert!(ws.dlt_dir().join("templates").is_dir());
        assert!(ws.root().join("devices").is_dir());
        assert!(ws.root().join("shipments").is_dir());
        assert!(ws.root().join("recycling").is_dir());
        assert!(ws.root().join("refurbishment").is_dir());
        assert!(ws.root().join("profile").is_dir());
    }

    #[test]
    fn test_workspace_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path()).unwrap();

        let err = Workspace::init(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::AlreadyExists(_)));
    }

    #[test]
    fn test_workspace_discover_finds_marker() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let ws = Workspace::discover_from(&subdir).unwrap();
        assert_eq!(
            ws.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_workspace_discover_fails_without_marker() {
        let tmp = tempdir().unwrap();
        let err = Workspace::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound { .. }));
    }

    #[test]
    fn test_record_path_by_prefix() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();

        let device = ws.record_path(&RecordId::device(1234));
        assert!(device.ends_with("devices/NX-001234.dlt.yaml"));

        let batch = ws.record_path(&RecordId::batch(2024, 1));
        assert!(batch.ends_with("recycling/RC-2024-001.dlt.yaml"));
    }
}

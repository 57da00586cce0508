//! Session tokens for the simulated account flow
//!
//! Nothing verifies these tokens; sign-in is simulated end to end. A token
//! is minted on login so the flow has a visible artifact, stored under the
//! user data directory, and removed again on logout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use ulid::Ulid;

/// A locally stored sign-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

impl Session {
    /// Mint a fresh session for the given account email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            token: Ulid::new().to_string(),
            email: email.into(),
            created: Utc::now(),
        }
    }

    /// Default session file under the user data directory
    pub fn default_path() -> Result<PathBuf, SessionError> {
        directories::ProjectDirs::from("", "", "dlt")
            .map(|dirs| dirs.data_dir().join("session.yaml"))
            .ok_or(SessionError::NoHomeDirectory)
    }

    /// Write the session to the given file
    pub fn save_to(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Io(e.to_string()))?;
        }
        let contents =
            serde_yml::to_string(self).map_err(|e| SessionError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| SessionError::Io(e.to_string()))?;
        Ok(())
    }

    /// Read a session back, None if the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Session>, SessionError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(path).map_err(|e| SessionError::Io(e.to_string()))?;
        let session =
            serde_yml::from_str(&contents).map_err(|e| SessionError::Serialize(e.to_string()))?;
        Ok(Some(session))
    }

    /// Remove the session file; missing file is fine
    pub fn clear(path: &Path) -> Result<(), SessionError> {
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| SessionError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

/// Errors from session storage
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not determine a home directory for session storage")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(String),

    #[error("session file error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_session_roundtrip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("data/session.yaml");

        let session = Session::new("jane@example.com");
        session.save_to(&path).unwrap();

        let loaded = Session::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.email, "jane@example.com");
        assert_eq!(loaded.token, session.token);
        // ULID tokens are 26 chars of Crockford base32
        assert_eq!(loaded.token.len(), 26);
    }

    #[test]
    fn test_load_missing_is_none() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("session.yaml");
        assert!(Session::load_from(&path).unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("session.yaml");

        Session::new("jane@example.com").save_to(&path).unwrap();
        assert!(path.exists());

        Session::clear(&path).unwrap();
        assert!(!path.exists());

        // Clearing again is a no-op
        Session::clear(&path).unwrap();
    }
}

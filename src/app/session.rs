// ClassDesk - app/session.rs
//
// Session persistence: remember the server, token, selected classroom and
// active tab between application restarts.
//
// - The session is saved atomically (write temp, rename) so a crash during
//   save never corrupts the previous good session.
// - Load errors are discarded: a corrupt or incompatible session just starts
//   the app fresh.
// - No classroom data is persisted; everything is re-fetched on start.
// - The token is stored as given and never written to the log.

use crate::core::model::Panel;
use crate::platform::fs::write_atomic;
use crate::util::constants::SESSION_FILE_NAME;
use crate::util::error::ClassDeskError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks.
///
/// Increment whenever `SessionData` changes in a breaking way. Version
/// mismatches discard the session.
pub const SESSION_VERSION: u32 = 1;

/// Complete persistent session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Schema version; must equal `SESSION_VERSION` to be accepted.
    pub version: u32,

    #[serde(default)]
    pub base_url: String,

    /// Bearer token, if the user chose to connect with one.
    #[serde(default)]
    pub token: Option<String>,

    /// Classroom open when the app was closed.
    #[serde(default)]
    pub classroom_id: Option<String>,

    #[serde(default)]
    pub active_tab: Panel,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            base_url: String::new(),
            token: None,
            classroom_id: None,
            active_tab: Panel::default(),
        }
    }
}

/// Connection values given on the command line (or via the environment).
/// Each one replaces the matching saved value; unset fields keep it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOverrides {
    pub server: Option<String>,
    pub token: Option<String>,
    pub classroom: Option<String>,
}

/// Resolve the session file path from the platform data directory.
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

/// Save `data` to `path` atomically, creating parent directories as needed.
pub fn save(data: &SessionData, path: &Path) -> Result<(), ClassDeskError> {
    let json = serde_json::to_vec_pretty(data).map_err(|e| ClassDeskError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_atomic(path, &json).map_err(|e| ClassDeskError::Io {
        path: path.to_path_buf(),
        operation: "save session",
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load and validate a `SessionData` from `path`.
///
/// Returns `None` on any error (file not found, JSON parse failure, version
/// mismatch). The caller treats `None` as "start fresh".
pub fn load(path: &Path) -> Option<SessionData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
            }
        })
        .ok()?;

    let data: SessionData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Session file is malformed, starting fresh"
            );
        })
        .ok()?;

    if data.version != SESSION_VERSION {
        tracing::warn!(
            found = data.version,
            expected = SESSION_VERSION,
            "Session file version mismatch, starting fresh"
        );
        return None;
    }

    tracing::info!(
        path = %path.display(),
        classroom = data.classroom_id.as_deref().unwrap_or("-"),
        "Session file loaded"
    );
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_data() -> SessionData {
        SessionData {
            version: SESSION_VERSION,
            base_url: "https://school.example".to_string(),
            token: Some("secret-token".to_string()),
            classroom_id: Some("c42".to_string()),
            active_tab: Panel::Content,
        }
    }

    #[test]
    fn test_session_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        let original = sample_data();

        save(&original, &path).expect("save should succeed");
        let loaded = load(&path).expect("load should return Some after valid save");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_session_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nonexistent.json")).is_none());
    }

    #[test]
    fn test_session_load_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        std::fs::write(&path, b"not valid json {{{{").unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_session_load_wrong_version_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        let mut data = sample_data();
        data.version = 99;
        save(&data, &path).unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_session_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        std::fs::write(&path, br#"{"version":1}"#).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.active_tab, Panel::default());
        assert!(loaded.classroom_id.is_none());
    }

    #[test]
    fn test_session_save_survives_leftover_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        save(&sample_data(), &path).unwrap();

        std::fs::write(dir.path().join("session.json.tmp"), b"garbage").unwrap();

        let mut updated = sample_data();
        updated.active_tab = Panel::Settings;
        save(&updated, &path).unwrap();
        assert_eq!(load(&path).unwrap().active_tab, Panel::Settings);
    }
}

//! File-based state persistence implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{LoadResult, RunState, StateError, StateStore};

/// Current state file format version.
const STATE_FILE_VERSION: u32 = 1;

/// On-disk state file format.
///
/// The run-state fields sit at the top level so other readers (the
/// dashboard) can consume the file without knowing about the envelope.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    /// Format version; any other value is treated as corrupted.
    version: u32,

    /// When the file was written (RFC 3339). Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<String>,

    #[serde(flatten)]
    state: RunState,
}

impl StateFile {
    fn new(state: &RunState) -> Self {
        Self {
            version: STATE_FILE_VERSION,
            saved_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            state: state.clone(),
        }
    }
}

/// JSON file implementation of [`StateStore`].
///
/// # Atomic Writes
///
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// Readers see either the previous or the new file, never a partial one.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Creates a new file-based state store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_blocking(path: &Path, file: &StateFile) -> Result<(), StateError> {
        let content = serde_json::to_string_pretty(file).map_err(StateError::Serialize)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StateError::Write)?;
            }
        }

        // state.json -> state.json.tmp, not state.tmp
        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

        std::fs::write(&temp_path, content).map_err(StateError::Write)?;
        std::fs::rename(&temp_path, path).map_err(StateError::Write)?;

        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> LoadResult {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        match serde_json::from_str::<StateFile>(&content) {
            Ok(file) if file.version == STATE_FILE_VERSION => LoadResult::Loaded(file.state),
            Ok(file) => LoadResult::Corrupted {
                reason: format!(
                    "Incompatible version: expected {STATE_FILE_VERSION}, got {}",
                    file.version
                ),
            },
            Err(e) => LoadResult::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            },
        }
    }

    async fn save(&self, state: &RunState) -> Result<(), StateError> {
        let path = self.path.clone();
        let file = StateFile::new(state);

        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &file))
            .await
            .map_err(|e| StateError::Task(e.to_string()))?
    }
}

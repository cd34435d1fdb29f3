//! Best-effort transcript storage between sessions.
//!
//! Stores report errors, but the controller only logs them: a session never
//! depends on persistence for correctness.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::core::config::io::project_dirs;
use crate::core::config::{path_display, ConfigError};
use crate::core::message::Message;

const TRANSCRIPT_FILE: &str = "transcript.json";

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "transcript I/O error at {}: {source}", path_display(path))
            }
            StoreError::Json { path, source } => {
                write!(f, "invalid transcript at {}: {source}", path_display(path))
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Json { source, .. } => Some(source),
        }
    }
}

pub trait TranscriptStore: Send {
    fn load(&self) -> Result<Vec<Message>, StoreError>;
    fn save(&self, messages: &[Message]) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// JSON file written atomically through a temp file in the same directory.
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    path: PathBuf,
}

impl FileTranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the per-user data directory.
    pub fn in_data_dir() -> Result<Self, ConfigError> {
        Ok(Self::new(project_dirs()?.data_dir().join(TRANSCRIPT_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TranscriptStore for FileTranscriptStore {
    fn load(&self) -> Result<Vec<Message>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, messages: &[Message]) -> Result<(), StoreError> {
        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;

        let contents =
            serde_json::to_string_pretty(messages).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        let mut temp_file = NamedTempFile::new_in(parent).map_err(|err| self.io_error(err))?;
        temp_file
            .write_all(contents.as_bytes())
            .and_then(|_| temp_file.as_file().sync_all())
            .map_err(|err| self.io_error(err))?;
        temp_file
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// In-memory store; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryTranscriptStore {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MemoryTranscriptStore {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages: Arc::new(Mutex::new(messages)),
        }
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl TranscriptStore for MemoryTranscriptStore {
    fn load(&self) -> Result<Vec<Message>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, messages: &[Message]) -> Result<(), StoreError> {
        if let Ok(mut guard) = self.messages.lock() {
            *guard = messages.to_vec();
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if let Ok(mut guard) = self.messages.lock() {
            guard.clear();
        }
        Ok(())
    }
}

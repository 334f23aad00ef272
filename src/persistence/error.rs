use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the persistence layer.
///
/// A missing state file is not an error; loads return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Read/write denied, device error, or similar
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The state file exists but does not parse
    #[error("saved state at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode application state: {0}")]
    Encode(#[source] serde_json::Error),
}

impl PersistenceError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

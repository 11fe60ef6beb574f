//! Error type shared by every store operation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Which registry a type tag was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Event,
    Snapshot,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadKind::Event => write!(f, "event"),
            PayloadKind::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Errors that can occur while appending to or reading from a log
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error while {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode record at {path}:{line}: {source}")]
    Decode {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record at {path}:{line} is not valid UTF-8: {source}")]
    InvalidText {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode record for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {kind} type registered for tag '{tag}'")]
    UnknownTypeTag { kind: PayloadKind, tag: String },

    #[error("failed to encode payload tagged '{tag}': {source}")]
    PayloadEncode {
        tag: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload tagged '{tag}' does not match its registered shape: {source}")]
    PayloadDecode {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn decode(path: impl Into<PathBuf>, line: usize, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.into(),
            line,
            source,
        }
    }

    #[must_use]
    pub fn invalid_text(path: impl Into<PathBuf>, line: usize, source: std::io::Error) -> Self {
        Self::InvalidText {
            path: path.into(),
            line,
            source,
        }
    }

    #[must_use]
    pub fn encode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Encode {
            path: path.into(),
            source,
        }
    }
}

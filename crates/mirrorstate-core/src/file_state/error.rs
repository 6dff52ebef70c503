//! Error and verdict types for local file evaluation.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hard failure while inspecting a local file. Absence is not an error; it is
/// reported through [`super::FileState::is_missing`].
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("stat file failed (path: {})", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("not a regular file (path: {})", .path.display())]
    NotAFile { path: PathBuf },
    #[error("can't open file (path: {})", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("calculating MD5 checksum failed (path: {})", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EvaluateError {
    /// Path that was being inspected.
    pub fn path(&self) -> &Path {
        match self {
            EvaluateError::Stat { path, .. }
            | EvaluateError::NotAFile { path }
            | EvaluateError::Open { path, .. }
            | EvaluateError::Read { path, .. } => path,
        }
    }

    /// Kind of the underlying I/O failure, if there was one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            EvaluateError::Stat { source, .. }
            | EvaluateError::Open { source, .. }
            | EvaluateError::Read { source, .. } => Some(source.kind()),
            EvaluateError::NotAFile { .. } => None,
        }
    }
}

/// Why a local copy is not a complete, uncorrupted mirror of its remote file.
///
/// These are ordinary outcomes of a resumable transfer, returned as data by
/// [`super::FileState::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
    /// Nothing exists at the local path.
    Missing,
    /// The local file has zero length.
    Empty,
    /// The local file is shorter than the remote one.
    Incomplete { got: u64, want: u64 },
    /// Length is sufficient but the content digest differs.
    Corrupted { checksum: String },
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invalid::Missing => write!(f, "missing"),
            Invalid::Empty => write!(f, "empty"),
            Invalid::Incomplete { got, want } => {
                write!(f, "incomplete: got {}, want {}", got, want)
            }
            Invalid::Corrupted { checksum } => {
                write!(f, "corrupted: checksum mismatch {}", checksum)
            }
        }
    }
}

impl std::error::Error for Invalid {}

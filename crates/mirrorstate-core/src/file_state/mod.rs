//! Local file state: compares an on-disk copy with its remote descriptor.
//!
//! [`evaluate`] stats the local path and, when something is there, streams it
//! through MD5. The resulting [`FileState`] is a snapshot; it answers whether
//! the copy is complete and valid ([`FileState::validate`]) and how many bytes
//! a resumed transfer may skip ([`FileState::offset`]). Re-checking after the
//! file changes means evaluating again.

mod error;

use crate::checksum;
use crate::remote::RemoteFile;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

pub use error::{EvaluateError, Invalid};

/// What the transfer layer should do with a file, given its evaluated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPlan {
    /// Local copy is complete and matches; nothing to transfer.
    Skip,
    /// Nothing on disk yet; download from byte 0.
    Start,
    /// Keep the first `offset` bytes and request the rest.
    Resume { offset: u64 },
    /// Local bytes can't be trusted; truncate and download from byte 0.
    Restart,
}

/// Snapshot of a local file evaluated against a [`RemoteFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileState<'a> {
    remote: &'a RemoteFile,
    local_path: PathBuf,
    missing: bool,
    local_checksum: Option<String>,
    local_size: u64,
}

/// Inspect `local_path` and build its [`FileState`] against `remote`.
///
/// A path that does not exist yields a missing state. Any other stat, open or
/// read failure, or a path that is not a regular file, is an error. The file
/// handle is closed before this returns.
pub fn evaluate<'a>(
    remote: &'a RemoteFile,
    local_path: impl AsRef<Path>,
) -> Result<FileState<'a>, EvaluateError> {
    let local_path = local_path.as_ref().to_path_buf();

    let meta = match fs::metadata(&local_path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %local_path.display(), "local file missing");
            return Ok(FileState {
                remote,
                local_path,
                missing: true,
                local_checksum: None,
                local_size: 0,
            });
        }
        Err(source) => {
            return Err(EvaluateError::Stat {
                path: local_path,
                source,
            })
        }
    };

    if !meta.is_file() {
        return Err(EvaluateError::NotAFile { path: local_path });
    }

    let file = match File::open(&local_path) {
        Ok(f) => f,
        Err(source) => {
            return Err(EvaluateError::Open {
                path: local_path,
                source,
            })
        }
    };
    let local_checksum = match checksum::md5_reader(file) {
        Ok(sum) => sum,
        Err(source) => {
            return Err(EvaluateError::Read {
                path: local_path,
                source,
            })
        }
    };

    let local_size = meta.len();
    tracing::debug!(
        path = %local_path.display(),
        local_size,
        remote_size = remote.size(),
        checksum = %local_checksum,
        "evaluated local file"
    );

    if local_size == remote.size() && local_checksum != remote.md5_checksum() {
        tracing::warn!(
            path = %local_path.display(),
            size = local_size,
            "full-length local file fails checksum"
        );
    }

    Ok(FileState {
        remote,
        local_path,
        missing: false,
        local_checksum: Some(local_checksum),
        local_size,
    })
}

impl<'a> FileState<'a> {
    pub fn remote(&self) -> &'a RemoteFile {
        self.remote
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn is_missing(&self) -> bool {
        self.missing
    }

    /// MD5 of the local bytes; `None` when the file is missing.
    pub fn local_checksum(&self) -> Option<&str> {
        self.local_checksum.as_deref()
    }

    /// Length observed at stat time; 0 when missing.
    pub fn local_size(&self) -> u64 {
        self.local_size
    }

    fn checksum_matches(&self) -> bool {
        self.local_checksum.as_deref() == Some(self.remote.md5_checksum())
    }

    /// Check that the local copy is a complete, uncorrupted mirror.
    ///
    /// Checks run in a fixed order (missing, empty, incomplete, checksum) and
    /// the first failure is reported. A file longer than the remote one falls
    /// through to the checksum comparison.
    pub fn validate(&self) -> Result<(), Invalid> {
        if self.missing {
            return Err(Invalid::Missing);
        }
        if self.local_size == 0 {
            return Err(Invalid::Empty);
        }
        if self.local_size < self.remote.size() {
            return Err(Invalid::Incomplete {
                got: self.local_size,
                want: self.remote.size(),
            });
        }
        if !self.checksum_matches() {
            return Err(Invalid::Corrupted {
                checksum: self.local_checksum.clone().unwrap_or_default(),
            });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Number of local bytes a resumed transfer can keep.
    ///
    /// A partial file is trusted up to its length; its digest can't match the
    /// full-file digest, so it isn't compared. A file longer than the remote
    /// one, or exactly as long but with the wrong digest, has no safe prefix
    /// and yields 0.
    pub fn offset(&self) -> u64 {
        let want = self.remote.size();
        if self.local_size > want {
            return 0;
        }
        if self.local_size == want && !self.checksum_matches() {
            return 0;
        }
        self.local_size
    }

    /// Decide what the transfer layer should do with this file.
    pub fn plan(&self) -> TransferPlan {
        if self.missing {
            return TransferPlan::Start;
        }
        if self.is_valid() {
            return TransferPlan::Skip;
        }
        match self.offset() {
            0 => TransferPlan::Restart,
            offset => TransferPlan::Resume { offset },
        }
    }
}

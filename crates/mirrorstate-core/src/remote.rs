//! Remote file descriptors as supplied by the remote metadata listing.
//!
//! A [`RemoteFile`] is the authoritative record a local copy is checked
//! against: the object's byte length and its MD5 content digest. It is built
//! once (from a listing or from the command line) and never mutated.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Length of a hex-encoded 128-bit digest.
pub const MD5_HEX_LEN: usize = 32;

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteFileError {
    #[error("invalid md5 checksum {0:?}: expected 32 hex characters")]
    InvalidChecksum(String),
    #[error("invalid size {0:?}: expected a non-negative integer")]
    InvalidSize(String),
}

/// Authoritative size and checksum of a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRemoteFile")]
pub struct RemoteFile {
    id: Option<String>,
    name: Option<String>,
    size: u64,
    md5_checksum: String,
}

impl RemoteFile {
    /// Build a descriptor from its two authoritative fields. The checksum is
    /// normalized to lowercase.
    pub fn new(size: u64, md5_checksum: &str) -> Result<Self, RemoteFileError> {
        Ok(Self {
            id: None,
            name: None,
            size,
            md5_checksum: normalize_checksum(md5_checksum)?,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lowercase hex MD5 of the full remote content.
    pub fn md5_checksum(&self) -> &str {
        &self.md5_checksum
    }

    /// Label for logs and reports: name, then id, then a placeholder.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// Where this file is mirrored inside `dir`.
    ///
    /// Uses the sanitized name, falling back to the id when the name is absent
    /// or sanitizes to nothing. Returns `None` if neither is usable.
    pub fn local_path_in(&self, dir: &Path) -> Option<PathBuf> {
        [self.name.as_deref(), self.id.as_deref()]
            .into_iter()
            .flatten()
            .map(sanitize_name)
            .find(|s| !s.is_empty())
            .map(|s| dir.join(s))
    }
}

fn normalize_checksum(raw: &str) -> Result<String, RemoteFileError> {
    let trimmed = raw.trim();
    if trimmed.len() != MD5_HEX_LEN || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RemoteFileError::InvalidChecksum(raw.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Make a listing name safe to use as a single path component.
///
/// Separators, NUL and control characters become `_` (runs collapse to one),
/// surrounding dots and whitespace are trimmed so `.`/`..` can never escape
/// the mirror directory, and the result is cut to NAME_MAX bytes without
/// leaving a trailing dot or space.
fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let bad = c == '/' || c == '\\' || c == '\0' || c.is_control();
        if bad {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let is_edge = |c: char| c == '.' || c.is_whitespace();
    let trimmed = out.trim_matches(is_edge);
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    // The cut can expose a dot or space at the new end.
    trimmed[..end].trim_end_matches(is_edge).to_string()
}

/// Listing entry as it appears on the wire, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRemoteFile {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    size: RawSize,
    md5_checksum: String,
}

/// Drive-style listings encode int64 values as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSize {
    Number(u64),
    Text(String),
}

impl TryFrom<RawRemoteFile> for RemoteFile {
    type Error = RemoteFileError;

    fn try_from(raw: RawRemoteFile) -> Result<Self, Self::Error> {
        let size = match raw.size {
            RawSize::Number(n) => n,
            RawSize::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| RemoteFileError::InvalidSize(s.clone()))?,
        };
        Ok(Self {
            id: raw.id,
            name: raw.name,
            size,
            md5_checksum: normalize_checksum(&raw.md5_checksum)?,
        })
    }
}

/// Parse a manifest: either a bare JSON array of remote files or a listing
/// object with a `files` array. A bad entry is reported with its index.
pub fn parse_manifest(json: &str) -> Result<Vec<RemoteFile>> {
    let doc: Value = serde_json::from_str(json).context("parse manifest JSON")?;
    let entries = match doc {
        Value::Array(entries) => entries,
        Value::Object(mut listing) => match listing.remove("files") {
            Some(Value::Array(entries)) => entries,
            _ => bail!("manifest object has no `files` array"),
        },
        _ => bail!("manifest must be a JSON array or an object with a `files` array"),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            serde_json::from_value::<RemoteFile>(entry)
                .with_context(|| format!("manifest entry {idx}"))
        })
        .collect()
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<RemoteFile>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read manifest {}", path.display()))?;
    let files =
        parse_manifest(&data).with_context(|| format!("load manifest {}", path.display()))?;
    tracing::debug!(path = %path.display(), entries = files.len(), "manifest loaded");
    Ok(files)
}

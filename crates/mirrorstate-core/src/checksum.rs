//! MD5 content digests for local files.
//!
//! Remote listings publish a 128-bit MD5 per object, so that is the digest the
//! evaluator compares against. Hashing is streamed so arbitrarily large files
//! are handled with a fixed buffer.

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Hash everything `reader` yields and return the digest as lowercase hex.
///
/// Interrupted reads are retried; any other read error is returned as-is so the
/// caller can attach its own context.
pub fn md5_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the MD5 of a file on disk.
pub fn md5_path(path: &Path) -> Result<String> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    md5_reader(f).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn md5_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let digest = md5_path(f.path()).unwrap();
        assert_eq!(digest, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn md5_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        let digest = md5_path(f.path()).unwrap();
        assert_eq!(digest, "b1946ac92492d2347c6235b4d2611184");
    }

    #[test]
    fn md5_reader_spans_multiple_buffers() {
        // Larger than one buffer so the chunked loop is exercised.
        let data: Vec<u8> = (0u8..=255).cycle().take(BUF_SIZE * 3 + 17).collect();
        let streamed = md5_reader(&data[..]).unwrap();
        assert_eq!(streamed, hex::encode(Md5::digest(&data)));
        assert_eq!(streamed.len(), 32);
    }

    #[test]
    fn md5_path_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        let err = md5_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.bin"));
    }
}

//! Checksum command: compute MD5 of a file.

use anyhow::Result;
use mirrorstate_core::checksum;
use std::path::Path;

/// Compute and print MD5 of the given file, `md5sum`-style.
pub async fn run_checksum(path: &Path) -> Result<()> {
    let owned = path.to_path_buf();
    let digest = tokio::task::spawn_blocking(move || checksum::md5_path(&owned)).await??;
    println!("{}  {}", digest, path.display());
    Ok(())
}

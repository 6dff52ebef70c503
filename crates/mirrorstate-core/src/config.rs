use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_PREFIX: &str = "mirrorstate";

/// Permission bits for directories this tool creates.
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

/// Global configuration loaded from `~/.config/mirrorstate/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Directory mirrored files are checked in when none is given on the
    /// command line (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Maximum number of files hashed at the same time by `check-manifest`.
    #[serde(default = "default_max_parallel_checks")]
    pub max_parallel_checks: usize,
}

fn default_max_parallel_checks() -> usize {
    4
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            max_parallel_checks: default_max_parallel_checks(),
        }
    }
}

/// Create `dir` and any missing parents.
///
/// Succeeds if the directory already exists, including when another process
/// creates it concurrently. New directories get mode 0755 on Unix.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    match builder.create(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("create directory {}", dir.display())),
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    Ok(config_path_in(&xdg_dirs.get_config_home()))
}

/// `config.toml` under the app directory of an XDG config home.
fn config_path_in(config_home: &Path) -> PathBuf {
    config_home.join(APP_PREFIX).join("config.toml")
}

/// Resolve the configuration directory and create it if absent.
pub fn config_dir() -> Result<PathBuf> {
    let path = config_path()?;
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .context("config path has no parent directory")?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Read a config file, writing the defaults there first if it doesn't exist.
pub fn load_or_init_at(path: &Path) -> Result<MirrorConfig> {
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MirrorConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from the XDG config directory, creating defaults on first run.
pub fn load_or_init() -> Result<MirrorConfig> {
    let dir = config_dir()?;
    load_or_init_at(&dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MirrorConfig::default();
        assert!(cfg.download_dir.is_none());
        assert_eq!(cfg.max_parallel_checks, 4);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            download_dir = "/srv/mirror"
            max_parallel_checks = 8
        "#;
        let cfg: MirrorConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/srv/mirror")));
        assert_eq!(cfg.max_parallel_checks, 8);
    }

    #[test]
    fn config_toml_missing_fields_use_defaults() {
        let cfg: MirrorConfig = toml::from_str("").unwrap();
        assert!(cfg.download_dir.is_none());
        assert_eq!(cfg.max_parallel_checks, 4);
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/conf/config.toml");

        let first = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(first.max_parallel_checks, 4);

        fs::write(&path, "max_parallel_checks = 2\n").unwrap();
        let second = load_or_init_at(&path).unwrap();
        assert_eq!(second.max_parallel_checks, 2);
    }

    #[test]
    fn config_path_always_adds_app_dir() {
        assert_eq!(
            config_path_in(Path::new("/home/u/.config")),
            PathBuf::from("/home/u/.config/mirrorstate/config.toml")
        );
        // A config home that happens to end in the app name still gets its own subdir.
        assert_eq!(
            config_path_in(Path::new("/opt/mirrorstate")),
            PathBuf::from("/opt/mirrorstate/mirrorstate/config.toml")
        );
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c");
        ensure_dir(&target).unwrap();
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn ensure_dir_rejects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, b"x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }
}

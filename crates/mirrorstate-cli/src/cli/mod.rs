//! CLI for checking mirrored files against their remote records.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use mirrorstate_core::config;
use std::path::{Path, PathBuf};

use commands::{run_check, run_check_manifest, run_checksum, run_completions, run_man};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mirrorstate")]
#[command(
    about = "Decide whether mirrored files are complete, resumable, or must be re-downloaded",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check one local file against a remote size and MD5.
    Check {
        /// Path to the local copy.
        path: String,
        /// Authoritative size of the remote file in bytes.
        #[arg(long)]
        size: u64,
        /// Authoritative MD5 of the remote file (32 hex characters).
        #[arg(long)]
        md5: String,
    },

    /// Check every entry of a JSON remote listing against a local directory.
    CheckManifest {
        /// Path to the manifest (array of {name, size, md5Checksum} or a listing with `files`).
        manifest: String,
        /// Directory holding the mirrored files (default: config download_dir, then cwd).
        #[arg(long, value_name = "DIR")]
        dir: Option<String>,
        /// Hash up to N files at once (default: config max_parallel_checks).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Compute MD5 of a file.
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Check { path, size, md5 } => run_check(Path::new(&path), size, &md5).await?,
            CliCommand::CheckManifest {
                manifest,
                dir,
                jobs,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let dir = match dir.map(PathBuf::from).or(cfg.download_dir) {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                let jobs = jobs.unwrap_or(cfg.max_parallel_checks).max(1);
                run_check_manifest(Path::new(&manifest), &dir, jobs).await?;
            }
            CliCommand::Checksum { path } => run_checksum(Path::new(&path)).await?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

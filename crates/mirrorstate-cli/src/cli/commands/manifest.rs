//! `mirrorstate check-manifest` – evaluate every file of a remote listing.
//!
//! Each entry is hashed on tokio's blocking pool; a semaphore caps how many
//! files are read at once. Every evaluation opens its own handle and yields
//! its own snapshot, so entries need no coordination.

use anyhow::{bail, Result};
use mirrorstate_core::file_state::{self, TransferPlan};
use mirrorstate_core::remote::{self, RemoteFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::check::describe_plan;

/// Outcome for one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EntryStatus {
    Checked {
        verdict: String,
        offset: u64,
        plan: TransferPlan,
    },
    /// Evaluation failed (I/O error, unusable name); the transfer must not guess.
    Failed(String),
}

#[derive(Debug, Clone)]
pub(crate) struct EntryReport {
    pub name: String,
    pub size: u64,
    pub status: EntryStatus,
}

fn check_entry(file: &RemoteFile, dir: &Path) -> EntryStatus {
    let Some(path) = file.local_path_in(dir) else {
        return EntryStatus::Failed("no usable name or id".to_string());
    };
    match file_state::evaluate(file, &path) {
        Ok(state) => EntryStatus::Checked {
            verdict: match state.validate() {
                Ok(()) => "valid".to_string(),
                Err(reason) => reason.to_string(),
            },
            offset: state.offset(),
            plan: state.plan(),
        },
        Err(err) => {
            let err = anyhow::Error::from(err);
            tracing::warn!(path = %path.display(), "evaluation failed: {:#}", err);
            EntryStatus::Failed(format!("{:#}", err))
        }
    }
}

/// Evaluate all `files` under `dir`, at most `jobs` at a time. Reports come
/// back in manifest order.
pub(crate) async fn evaluate_all(
    files: Vec<RemoteFile>,
    dir: PathBuf,
    jobs: usize,
) -> Result<Vec<EntryReport>> {
    let permits = Arc::new(Semaphore::new(jobs.max(1)));
    let dir = Arc::new(dir);
    let mut set = JoinSet::new();

    for (idx, file) in files.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        let dir = Arc::clone(&dir);
        set.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let report = tokio::task::spawn_blocking(move || EntryReport {
                name: file.display_name().to_string(),
                size: file.size(),
                status: check_entry(&file, &dir),
            })
            .await?;
            Ok::<_, anyhow::Error>((idx, report))
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = set.join_next().await {
        reports.push(joined??);
    }
    reports.sort_by_key(|(idx, _)| *idx);
    Ok(reports.into_iter().map(|(_, r)| r).collect())
}

pub async fn run_check_manifest(manifest: &Path, dir: &Path, jobs: usize) -> Result<()> {
    let files = remote::load_manifest(manifest)?;
    if files.is_empty() {
        println!("Manifest has no files.");
        return Ok(());
    }
    tracing::info!(
        manifest = %manifest.display(),
        dir = %dir.display(),
        entries = files.len(),
        jobs,
        "checking manifest"
    );

    let reports = evaluate_all(files, dir.to_path_buf(), jobs).await?;

    println!("{:<12} {:<12} {:<12} {:<40} {}", "PLAN", "OFFSET", "SIZE", "STATE", "NAME");
    let mut failed = 0usize;
    for r in &reports {
        match &r.status {
            EntryStatus::Checked {
                verdict,
                offset,
                plan,
            } => println!(
                "{:<12} {:<12} {:<12} {:<40} {}",
                describe_plan(*plan),
                offset,
                r.size,
                verdict,
                r.name
            ),
            EntryStatus::Failed(msg) => {
                failed += 1;
                println!(
                    "{:<12} {:<12} {:<12} {:<40} {}",
                    "error", "-", r.size, msg, r.name
                );
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) could not be evaluated", failed, reports.len());
    }
    Ok(())
}

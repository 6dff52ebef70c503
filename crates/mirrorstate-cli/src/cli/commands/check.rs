//! `mirrorstate check` – evaluate one local file.

use anyhow::{Context, Result};
use mirrorstate_core::file_state::{self, TransferPlan};
use mirrorstate_core::remote::RemoteFile;
use std::path::Path;

pub(crate) fn describe_plan(plan: TransferPlan) -> String {
    match plan {
        TransferPlan::Skip => "skip".to_string(),
        TransferPlan::Start => "download".to_string(),
        TransferPlan::Resume { offset } => format!("resume@{offset}"),
        TransferPlan::Restart => "restart".to_string(),
    }
}

pub async fn run_check(path: &Path, size: u64, md5: &str) -> Result<()> {
    let remote = RemoteFile::new(size, md5).context("invalid remote reference")?;
    let owned = path.to_path_buf();
    let (verdict, offset, plan) = tokio::task::spawn_blocking(move || {
        let state = file_state::evaluate(&remote, &owned)?;
        let verdict = match state.validate() {
            Ok(()) => "valid".to_string(),
            Err(reason) => reason.to_string(),
        };
        Ok::<_, file_state::EvaluateError>((verdict, state.offset(), state.plan()))
    })
    .await??;

    tracing::info!(path = %path.display(), %verdict, offset, "checked local file");
    println!("{}: {}", path.display(), verdict);
    println!("offset: {}", offset);
    println!("plan:   {}", describe_plan(plan));
    Ok(())
}

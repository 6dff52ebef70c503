//! CLI command handlers, one file per command.

mod check;
mod checksum;
mod completions;
mod manifest;

pub use check::run_check;
pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use manifest::run_check_manifest;

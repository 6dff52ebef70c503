//! Tests for checksum, completions and man.

use super::parse;
use crate::cli::CliCommand;
use clap_complete::Shell;

#[test]
fn cli_parse_checksum() {
    match parse(&["mirrorstate", "checksum", "/path/to/file.bin"]) {
        CliCommand::Checksum { path } => assert_eq!(path, "/path/to/file.bin"),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["mirrorstate", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    match parse(&["mirrorstate", "man"]) {
        CliCommand::Man => {}
        _ => panic!("expected Man"),
    }
}

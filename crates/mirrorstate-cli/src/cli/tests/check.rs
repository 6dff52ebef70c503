//! Tests for check and check-manifest.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_check() {
    match parse(&[
        "mirrorstate",
        "check",
        "/data/file.iso",
        "--size",
        "1000",
        "--md5",
        "b1946ac92492d2347c6235b4d2611184",
    ]) {
        CliCommand::Check { path, size, md5 } => {
            assert_eq!(path, "/data/file.iso");
            assert_eq!(size, 1000);
            assert_eq!(md5, "b1946ac92492d2347c6235b4d2611184");
        }
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_check_requires_size_and_md5() {
    assert!(Cli::try_parse_from(["mirrorstate", "check", "f.bin"]).is_err());
    assert!(Cli::try_parse_from(["mirrorstate", "check", "f.bin", "--size", "1"]).is_err());
    assert!(
        Cli::try_parse_from(["mirrorstate", "check", "f.bin", "--size", "-1", "--md5", "x"])
            .is_err()
    );
}

#[test]
fn cli_parse_check_manifest_defaults() {
    match parse(&["mirrorstate", "check-manifest", "listing.json"]) {
        CliCommand::CheckManifest {
            manifest,
            dir,
            jobs,
        } => {
            assert_eq!(manifest, "listing.json");
            assert!(dir.is_none());
            assert!(jobs.is_none());
        }
        _ => panic!("expected CheckManifest"),
    }
}

#[test]
fn cli_parse_check_manifest_with_dir_and_jobs() {
    match parse(&[
        "mirrorstate",
        "check-manifest",
        "listing.json",
        "--dir",
        "/srv/mirror",
        "--jobs",
        "8",
    ]) {
        CliCommand::CheckManifest {
            manifest,
            dir,
            jobs,
        } => {
            assert_eq!(manifest, "listing.json");
            assert_eq!(dir.as_deref(), Some("/srv/mirror"));
            assert_eq!(jobs, Some(8));
        }
        _ => panic!("expected CheckManifest"),
    }
}

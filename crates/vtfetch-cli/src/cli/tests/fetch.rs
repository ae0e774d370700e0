//! Tests for the fetch subcommand and its override flags.

use super::parse;
use crate::cli::{flag_override, CliCommand};

#[test]
fn cli_parse_fetch() {
    match parse(&["vtfetch", "fetch", "https://example.com/pkg.deb"]) {
        CliCommand::Fetch {
            url,
            download,
            no_download,
            report,
            no_report,
        } => {
            assert_eq!(url, "https://example.com/pkg.deb");
            assert!(!download);
            assert!(!no_download);
            assert!(!report);
            assert!(!no_report);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_download() {
    match parse(&["vtfetch", "fetch", "https://example.com/x", "--download"]) {
        CliCommand::Fetch {
            download,
            no_download,
            ..
        } => {
            assert!(download);
            assert!(!no_download);
        }
        _ => panic!("expected Fetch with --download"),
    }
}

#[test]
fn cli_parse_fetch_no_report() {
    match parse(&["vtfetch", "fetch", "https://example.com/x", "--no-report"]) {
        CliCommand::Fetch {
            report, no_report, ..
        } => {
            assert!(!report);
            assert!(no_report);
        }
        _ => panic!("expected Fetch with --no-report"),
    }
}

#[test]
fn cli_parse_fetch_pair_keeps_last_flag() {
    match parse(&[
        "vtfetch",
        "fetch",
        "https://example.com/x",
        "--download",
        "--no-download",
    ]) {
        CliCommand::Fetch {
            download,
            no_download,
            ..
        } => {
            assert!(!download);
            assert!(no_download);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn flag_override_maps_pairs() {
    assert_eq!(flag_override(false, false), None);
    assert_eq!(flag_override(true, false), Some(true));
    assert_eq!(flag_override(false, true), Some(false));
}

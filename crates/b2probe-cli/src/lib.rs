//! # b2probe-cli: `check_b2share`
//!
//! Nagios-compatible health probe for B2SHARE instances (v2 and RDM-based).
//!
//! ## Output Contract
//!
//! stdout carries `hits: <n>`, optional vocabulary reports, an optional
//! separator (`-v` and above), and exactly one status line: `OK ...` or
//! `CRITICAL: <details>`. Diagnostics go to stderr through `tracing`.
//!
//! | Exit | Meaning |
//! |------|---------|
//! | 0 | OK |
//! | 2 | CRITICAL (any failure, or no records with `--error-if-no-records-present`) |
//! | 3 | malformed base URL |

pub mod args;
pub mod metadata_check;
pub mod probe;
pub mod verdict;

use std::io::Write;

pub use args::{MetadataOptions, ProbeArgs, ProbeConfig, TitleRuleArg, ValidationMode, Verbosity};
pub use metadata_check::{check_record_metadata, MetadataVerdict};
pub use probe::run_probe;
pub use verdict::{Outcome, ProbeError, Status, EXIT_INVALID_URL, SEPARATOR};

/// Validate `args`, run the probe, and print the status line.
///
/// Returns the process exit code.
pub async fn run(args: &ProbeArgs, out: &mut dyn Write) -> u8 {
    let config = match ProbeConfig::from_args(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {err}", err.status());
            return err.exit_code();
        }
    };

    match run_probe(&config, out).await {
        Ok(outcome) => {
            status_line(out, &outcome.to_string());
            Status::Ok.exit_code()
        }
        Err(err) => {
            status_line(out, &format!("{}: {err}", err.status()));
            err.exit_code()
        }
    }
}

fn status_line(out: &mut dyn Write, line: &str) {
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        tracing::error!("cannot write status line: {e}");
    }
}

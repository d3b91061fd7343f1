//! # check_b2share entry point
//!
//! Parses arguments, sets up stderr logging for the requested verbosity, and
//! runs the probe on a single-threaded runtime.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use b2probe_cli::{run, ProbeArgs, Verbosity};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = ProbeArgs::parse();
    let verbosity = Verbosity::from_count(args.verbose);

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive(args.debug_vocab)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("check_b2share v{} starting", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();
    ExitCode::from(run(&args, &mut stdout).await)
}

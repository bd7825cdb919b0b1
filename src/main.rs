//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `probe_status` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Reading targets from arguments, a file, or stdin
//! - Ctrl-C cancellation
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};

use probe_status::initialization::init_logger_with;
use probe_status::{
    format_result_line, load_targets, print_summary, Opt, ProbeResult, Runner,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let opt = Opt::parse();

    // Initialize logger based on options
    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let mut targets = opt.targets.clone();
    if let Some(path) = &opt.file {
        targets.extend(load_targets(path).await?);
    }
    if targets.is_empty() {
        bail!("no targets given; pass them as arguments or with --file");
    }

    let runner = Runner::new(opt.probe.clone()).context("Failed to initialize probe session")?;

    let cancel = runner.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding probes");
            cancel.cancel();
        }
    });

    let json = opt.json;
    let report = runner
        .run_enumeration(targets, |result| report_result(&result, json))
        .await;
    runner.close();

    print_summary(&report);
    Ok(())
}

/// Prints a result as a JSON line, or logs it (at error level when no
/// response was obtained).
fn report_result(result: &ProbeResult, json: bool) {
    if json {
        match serde_json::to_string(result) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("Failed to serialize result for {}: {e}", result.input),
        }
        return;
    }

    let line = format_result_line(result);
    if result.is_success() {
        info!("{line}");
    } else {
        error!("{line}");
    }
}

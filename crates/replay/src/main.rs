// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod script;

use clap::Parser;
use rowtrack_audit::TransitionLog;
use std::path::PathBuf;
use tracing::{error, info};

/// rowtrack replay - runs a script of change tracker operations and prints
/// the resulting transition log as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON script of tracker operations.
    #[arg(short, long)]
    script: PathBuf,

    /// Log filter used when `RUST_LOG` is not set (e.g. "debug", "rowtrack=trace").
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing; logs go to stderr so stdout carries only the JSON log
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let json: String = run(&args)?;
    println!("{json}");

    Ok(())
}

/// Replays the script named by `args` and returns the transition log as JSON.
fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    info!(script = %args.script.display(), "Replaying tracker script");

    let operations: Vec<script::Operation> = script::load(&args.script)?;
    let log: TransitionLog = match script::replay(&operations) {
        Ok(log) => log,
        Err(err) => {
            error!(error = %err, "Replay failed");
            return Err(err.into());
        }
    };

    Ok(log.to_json()?)
}

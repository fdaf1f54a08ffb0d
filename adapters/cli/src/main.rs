#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays placement scripts against a grid session.

mod config;
mod driver;
mod render;
mod script;

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, trace};
use tracing_subscriber::EnvFilter;

use crate::{config::Config, driver::Driver};

/// Replays a placement script and prints a transcript to stdout.
#[derive(Debug, Parser)]
#[command(name = "gridpack", version, about)]
struct Cli {
    /// TOML file describing the grid size and item catalog.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured grid width.
    #[arg(long)]
    width: Option<u32>,
    /// Overrides the configured grid height.
    #[arg(long)]
    height: Option<u32>,
    /// Script to replay; read from stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Entry point for the gridpack command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::builtin()?,
    };
    config.override_dimensions(cli.width, cli.height)?;

    let source = read_script(cli.script.as_ref())?;
    let actions = script::parse(&source)?;
    info!(
        actions = actions.len(),
        width = config.dimensions.width(),
        height = config.dimensions.height(),
        "script loaded"
    );

    let mut driver = Driver::new(config).context("failed to allocate the grid")?;
    let mut transcript = Vec::new();
    for (line, action) in actions {
        let start = transcript.len();
        driver.apply(action, &mut transcript);
        trace!(line, produced = transcript.len() - start, "action applied");
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in &transcript {
        writeln!(handle, "{line}").context("failed to write transcript")?;
    }
    Ok(())
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script at {}", path.display())),
        None => {
            let mut source = String::new();
            let _ = io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

//! appdeck CLI - build, validate and inspect embedded storefront apps
//!
//! This is the main entry point for the appdeck command-line interface.

mod cli;
mod commands;
mod output;
mod utils;
mod version;

use anyhow::Result;
use appdeck_core::ci;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{AppTarget, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);
    log_ci_metadata();

    let name = cli.command.name();
    let target = AppTarget {
        path: cli.path,
        config: cli.config,
    };

    match cli.command {
        Commands::App(cmd) => commands::app::run(cmd, target).await?,
        Commands::Init(args) => commands::init::run(args, target).await?,
        Commands::Version(args) => commands::version::run(args)?,
    }

    debug!("Completed command {}", name);
    Ok(())
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn log_ci_metadata() {
    let envs = ci::process_envs();
    let Some(platform) = ci::detect_ci_platform(&envs) else {
        return;
    };

    let metadata = ci::ci_metadata(platform, &envs);
    if !metadata.is_empty() {
        debug!("Running on {} CI: {:?}", platform, metadata);
    }
}

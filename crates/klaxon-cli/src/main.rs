//! Klaxon operator CLI
//!
//! Triggers and probes evacuations, lists composed variants, checks contact
//! data against the field validators, and seeds demo data.

use anyhow::Result;
use clap::{Parser, Subcommand};
use klaxon_core::{KlaxonConfig, SystemClock};
use klaxon_emergency::{Dispatcher, PublicAddress};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod demo;

use commands::contact::CheckContactArgs;

#[derive(Parser)]
#[command(name = "klaxon")]
#[command(about = "Klaxon - campus emergency alert operator tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger an evacuation and print the status envelope
    Dispatch {
        /// Emergency kind (epidemic, fire, flood, security)
        kind: String,

        /// Notify a single user instead of broadcasting
        #[arg(short, long)]
        recipient: Option<String>,
    },

    /// Check that a kind is ready to dispatch
    Probe {
        /// Emergency kind
        kind: String,
    },

    /// List composed variants in registration order
    Registry {
        /// Print full descriptors as JSON
        #[arg(long)]
        describe: bool,
    },

    /// Validate contact fields; fails on the first rejected value
    CheckContact(CheckContactArgs),

    /// Build the demo users and notifications and print counts
    SeedDemo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = KlaxonConfig::load(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Dispatch { kind, recipient } => {
            commands::dispatch::run(&dispatcher(&config)?, &kind, recipient.as_deref())?;
        }
        Commands::Probe { kind } => {
            commands::dispatch::probe(&dispatcher(&config)?, &kind)?;
        }
        Commands::Registry { describe } => {
            commands::registry::run(&dispatcher(&config)?, describe)?;
        }
        Commands::CheckContact(args) => {
            commands::contact::run(&args)?;
        }
        Commands::SeedDemo => {
            commands::seed::run(chrono::Utc::now())?;
        }
    }

    Ok(())
}

/// Compose the configured kinds into the process-wide registry
fn dispatcher(config: &KlaxonConfig) -> Result<Dispatcher<PublicAddress>> {
    let dispatcher = Dispatcher::from_config(
        &config.dispatch,
        klaxon_composition::global(),
        Arc::new(SystemClock),
        PublicAddress,
    )?;
    Ok(dispatcher)
}

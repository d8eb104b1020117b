//! CLI frontend for the Mapwright level build pipeline.

mod commands;

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, debug};

#[derive(Parser)]
#[command(
    name = "mw",
    about = "Mapwright: build level documents into scenes with deterministic ids",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every command that runs a build.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Level document (JSON)
    document: PathBuf,

    /// Template catalog (JSON). Defaults to the built-in catalog
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Build configuration (JSON). Missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a document and print the assigned ids, task counts and warnings
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Print the id ledger as JSON for comparing peers
    Ids {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Build a document and report warnings only
    Check {
        #[command(flatten)]
        args: BuildArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!("log level {log_level}");

    let result = match cli.command {
        Commands::Build { args } => commands::build::run(&args),
        Commands::Ids { args } => commands::ids::run(&args),
        Commands::Check { args } => commands::check::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

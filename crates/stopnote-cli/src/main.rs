//! CLI application for delivery-note extraction.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{process, rules};

/// Delivery-note extraction - turn a delivery-note PDF into a structured record
#[derive(Parser)]
#[command(name = "stopnote")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to rule file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    process: process::ProcessArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the rule file
    Rules(rules::RulesArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries only the record
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Rules(args)) => rules::run(args, cli.config.as_deref()),
        None => process::run(cli.process, cli.config.as_deref()),
    }
}

//! Rules command - inspect and validate the rule file.

use std::path::Path;
use std::process::ExitCode;

use clap::{Args, Subcommand};
use console::style;

use stopnote_core::{RuleConfig, RuleSet};

use super::resolve_rules_path;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// Show the parsed rule file
    Show,

    /// Show the resolved rule file path
    Path,

    /// Compile every pattern of the rule file
    Check,
}

pub fn run(args: RulesArgs, config_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let path = resolve_rules_path(config_path);

    match args.command {
        RulesCommand::Show => {
            let config = RuleConfig::from_file(&path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        RulesCommand::Path => {
            let marker = if path.exists() {
                style("(exists)").green()
            } else {
                style("(not found)").red()
            };
            println!("{} {}", path.display(), marker);
        }
        RulesCommand::Check => match RuleSet::load(&path) {
            Ok(_) => println!(
                "{} Rules in {} compiled",
                style("✓").green(),
                path.display()
            ),
            Err(e) => {
                println!("{} {}: {}", style("✗").red(), path.display(), e);
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

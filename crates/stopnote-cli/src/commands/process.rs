//! Process a single delivery note.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use serde_json::json;
use tracing::{info, warn};

use stopnote_core::{process_document, OutputSinks, RuleSet};

use super::resolve_rules_path;

/// Arguments for processing a document.
#[derive(Args)]
pub struct ProcessArgs {
    /// Delivery-note PDF
    input: Option<PathBuf>,

    /// Display name recorded instead of the input's file name
    name: Option<String>,

    /// Root directory for the txt/json/csv outputs
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
}

pub fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let Some(input) = args.input else {
        print_error("No path given");
        return Ok(ExitCode::FAILURE);
    };

    let rules_path = resolve_rules_path(config_path);
    let rules = match RuleSet::load(&rules_path) {
        Ok(rules) => rules,
        Err(e) => {
            warn!("Cannot use rule file {}: {}", rules_path.display(), e);
            print_error(&e.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    let sinks = OutputSinks::new(&args.output_dir);
    let record = match process_document(&input, args.name.as_deref(), &rules, &sinks) {
        Ok(record) => record,
        Err(e) => {
            warn!("Cannot write outputs below {}: {}", sinks.root().display(), e);
            print_error(&e.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(
        "Outputs for {} written below {}",
        record.file_name,
        sinks.root().display()
    );

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(ExitCode::SUCCESS)
}

fn print_error(message: &str) {
    println!("{}", json!({ "Error": message }));
}

//! CLI command implementations.

pub mod process;
pub mod rules;

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable naming a rule file.
pub const RULES_ENV: &str = "STOPNOTE_RULES";

const RULES_FILE: &str = "rules.json";

/// Resolve the rule file: an explicit path wins, then `STOPNOTE_RULES` if the
/// file exists, then `config/rules.json` next to the executable, then the
/// user config directory, then `./config/rules.json`.
pub fn resolve_rules_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let candidates = [
        env::var_os(RULES_ENV).map(PathBuf::from),
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("config").join(RULES_FILE))),
        dirs::config_dir().map(|dir| dir.join("stopnote").join(RULES_FILE)),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            debug!("Using rule file {}", candidate.display());
            return candidate;
        }
    }

    PathBuf::from("config").join(RULES_FILE)
}

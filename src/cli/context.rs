use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::core::errors::{DeployfigError, Result};

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global config directory path.
/// If `custom` is provided, uses that path; otherwise defaults to `.deployfig`.
pub fn init(custom: Option<&str>) {
    let dir = custom
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".deployfig"));
    let _ = CONFIG_DIR.set(dir);
}

/// Get the current config directory path.
pub fn config_dir() -> &'static Path {
    CONFIG_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(".deployfig"))
}

/// Fail unless `init` has been run.
pub fn require_initialized() -> Result<&'static Path> {
    let dir = config_dir();
    if !dir.exists() {
        return Err(DeployfigError::InvalidConfig {
            detail: "Deployfig not initialized. Run 'deployfig init' first.".into(),
        });
    }
    Ok(dir)
}

/// Return the explicitly selected profile or fail.
///
/// The value comes from `--profile` or `DEPLOYFIG_PROFILE`; clap folds
/// both into one option before we get here.
pub fn require_profile(selected: Option<&str>) -> Result<&str> {
    match selected.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(DeployfigError::ProfileNotSelected),
    }
}

fn profile_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid regex"))
}

/// Profile names become file names, so keep them to a safe alphabet.
pub fn validate_profile_name(name: &str) -> Result<()> {
    if profile_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(DeployfigError::InvalidConfig {
            detail: format!(
                "invalid profile name '{name}': use letters, digits, '-' and '_' only"
            ),
        })
    }
}

/// Reject anything that is not a plain file name (no separators, no `..`).
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let path = Path::new(name);
    let is_simple = !name.is_empty()
        && name != "."
        && name != ".."
        && path.file_name().is_some_and(|f| f == name)
        && !name.contains(['/', '\\']);

    if is_simple {
        Ok(())
    } else {
        Err(DeployfigError::InvalidConfig {
            detail: format!("invalid {what} '{name}': must be a plain file name"),
        })
    }
}

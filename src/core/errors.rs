use std::path::PathBuf;

/// All domain errors for Deployfig.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum DeployfigError {
    #[error(
        "No profile selected\n\n  \
         Deployfig never guesses which profile is active.\n\n  \
         Solutions:\n    \
         → Pass it explicitly: deployfig --profile production <command>\n    \
         → Or export it: export DEPLOYFIG_PROFILE=production"
    )]
    ProfileNotSelected,

    #[error(
        "Profile '{name}' not found\n\n  \
         Available profiles: {available}\n  \
         Check .deployfig/config.toml for profile definitions."
    )]
    ProfileNotFound { name: String, available: String },

    #[error(
        "Layer file for profile '{profile}' not found: {path}\n\n  \
         Every declared profile must have its layer file on disk.\n  \
         Run 'deployfig status' to see which layers are missing."
    )]
    LayerNotFound { profile: String, path: PathBuf },

    #[error(
        "Parse error in {file}: {detail}\n\n  \
         Expected format: KEY=value (one per line).\n  \
         Comments (#) and blank lines are allowed."
    )]
    ParseError { file: PathBuf, detail: String },

    #[error(
        "Setting '{key}' is required but not set in profile '{profile}'\n\n  \
         Add it to the profile's layer file or to the base layer."
    )]
    MissingSetting { key: String, profile: String },

    #[error("Invalid value for '{key}': '{value}' ({expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "This project uses format version {project_version}, but your Deployfig \
         only supports up to version {supported_version}.\n\n  \
         Update Deployfig: cargo install deployfig --force"
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error("Deployment check failed with {errors} error(s)")]
    LintFailed { errors: usize },

    #[error("Audit log error: {detail}")]
    AuditError { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DeployfigError>;

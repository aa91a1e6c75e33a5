use colored::Colorize;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;

/// Execute the `deployfig status` command.
///
/// Displays the declared profiles, their layer files, which profile is
/// selected, and whether secrets and auditing are set up.
pub fn execute(profile: Option<&str>) -> Result<()> {
    let config_dir = crate::cli::context::require_initialized()?;
    let config = AppConfig::load(config_dir)?;

    output::header(&format!("Deployfig v{}", env!("CARGO_PKG_VERSION")));
    output::line(&format!("  Config: {}", config_dir.join("config.toml").display()));
    output::line(&format!(
        "  Base profile: {}",
        config.deployfig.base_profile.cyan()
    ));
    output::line(&format!(
        "  Production profile: {}",
        config.deployfig.production_profile.cyan()
    ));

    match profile {
        Some(name) if config.profiles.contains_key(name) => {
            output::success(&format!("Selected profile: {name}"));
        }
        Some(name) => output::warning(&format!(
            "Selected profile '{name}' is not declared (available: {})",
            config.available_profiles()
        )),
        None => output::warning("No profile selected (use --profile or DEPLOYFIG_PROFILE)"),
    }

    output::line(&format!("\n{}", format!("  Profiles ({})", config.profiles.len()).bold()));
    for (name, entry) in &config.profiles {
        let file = config.layer_file_name(name);
        let lineage = if config.is_base(name) {
            "base".to_string()
        } else if entry.standalone {
            "standalone".to_string()
        } else {
            format!("extends {}", config.deployfig.base_profile)
        };
        let msg = format!("{name:<14} {file:<20} {}", lineage.dimmed());
        if config_dir.join(&file).exists() {
            output::success(&msg);
        } else {
            output::warning(&format!("{msg} (layer file missing)"));
        }
    }

    print_secrets(&config);

    output::line(&format!("\n{}", "  Audit".bold()));
    if config.audit_enabled() {
        let logger = JsonAuditLogger::for_project(config_dir, &config);
        output::success(&format!("Enabled ({})", logger.path().display()));
    } else {
        output::warning("Disabled");
    }

    Ok(())
}

fn print_secrets(config: &AppConfig) {
    output::line(&format!("\n{}", "  Secrets".bold()));
    if config.secrets.keys.is_empty() {
        output::warning("No secret keys declared under [secrets]");
        return;
    }
    for key in &config.secrets.keys {
        if std::env::var_os(key).is_some() {
            output::success(&format!("{key} injected from environment"));
        } else {
            output::warning(&format!("{key} not set in environment"));
        }
    }
}

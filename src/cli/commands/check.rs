use colored::Colorize;

use crate::cli::commands::layer_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{DeployfigError, Result};
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::lint::{LintReport, Severity};
use crate::core::services::lint_service::LintService;

/// Execute the `deployfig check` command.
///
/// Lints the selected profile, or every profile with `--all`.
/// Warnings are reported; any error makes the command fail.
pub fn execute(profile: Option<&str>, all: bool) -> Result<()> {
    let config_dir = crate::cli::context::require_initialized()?;
    let config = AppConfig::load(config_dir)?;

    let names: Vec<String> = if all {
        config.profiles.keys().cloned().collect()
    } else {
        vec![crate::cli::context::require_profile(profile)?.to_string()]
    };

    output::header("🔍 deployfig check");

    let svc = LintService;
    let mut errors = 0;
    let mut warnings = 0;

    for name in &names {
        let (resolved, files) = layer_helpers::resolve_profile(name, &config, config_dir)?;
        let report = svc.lint(&resolved, &config, &files);
        print_report(&report, config.is_production(name));
        errors += report.count(Severity::Error);
        warnings += report.count(Severity::Warning);
    }

    super::audit_helpers::log_audit(
        AuditAction::Check,
        names,
        Some(format!("{errors} error(s), {warnings} warning(s)")),
    );

    if errors > 0 {
        return Err(DeployfigError::LintFailed { errors });
    }

    output::line("");
    if warnings > 0 {
        output::success(&format!("No errors, {warnings} warning(s)"));
    } else {
        output::success("All checks passed");
    }
    Ok(())
}

fn print_report(report: &LintReport, production: bool) {
    let label = if production {
        format!("{} (production rules)", report.profile)
    } else {
        report.profile.clone()
    };
    output::line(&format!("\n  {}", label.bold()));

    if report.is_clean() {
        output::success("no issues");
        return;
    }

    for finding in &report.findings {
        match finding.severity {
            Severity::Error => output::line(&format!(
                "  {} {}: {}",
                "✗".red(),
                finding.severity.to_string().red(),
                finding.message
            )),
            Severity::Warning => output::warning(&format!(
                "{}: {}",
                finding.severity,
                finding.message
            )),
        }
    }
}

use chrono::{NaiveDate, TimeZone, Utc};
use colored::Colorize;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{DeployfigError, Result};
use crate::core::models::audit_entry::{AuditAction, AuditEntry, AuditFilter};
use crate::core::traits::audit::AuditLogger;

/// Execute the `deployfig log` command.
///
/// Displays the audit log, optionally narrowed to one author, one
/// profile (the global `--profile`), a start date, or the newest N
/// entries.
pub fn execute(
    profile: Option<&str>,
    author: Option<&str>,
    since: Option<&str>,
    last: Option<usize>,
) -> Result<()> {
    let config_dir = crate::cli::context::require_initialized()?;
    let config = AppConfig::load(config_dir)?;
    let logger = JsonAuditLogger::for_project(config_dir, &config);

    let filter = AuditFilter {
        author: author.map(str::to_string),
        profile: profile.map(str::to_string),
        since: since.map(parse_since).transpose()?,
    };

    let entries = logger.query(&filter)?;

    if entries.is_empty() {
        output::header("deployfig log");
        output::warning("No audit entries found");
        if !filter.is_empty() {
            output::line("  Try removing filters to see all entries.");
        }
        return Ok(());
    }

    // --last N keeps the newest N, still printed oldest first
    let skip = last.map_or(0, |n| entries.len().saturating_sub(n));
    let display: Vec<&AuditEntry> = entries.iter().skip(skip).collect();

    match profile {
        Some(p) => output::header(&format!(
            "deployfig log ({} entries for profile {p})",
            display.len()
        )),
        None => output::header(&format!("deployfig log ({} entries)", display.len())),
    }
    output::line("");

    for entry in &display {
        print_entry(entry);
    }

    Ok(())
}

/// Parse a date string (ISO 8601: `YYYY-MM-DD`) into a UTC DateTime.
fn parse_since(s: &str) -> Result<chrono::DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DeployfigError::InvalidConfig {
            detail: format!(
                "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2026-01-15"
            ),
        })
        .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).expect("midnight is always valid")))
}

/// Print a single audit entry as a formatted row.
fn print_entry(entry: &AuditEntry) {
    let date = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    let action = format_action(&entry.action);
    let profiles = if entry.profiles.is_empty() {
        "—".dimmed().to_string()
    } else {
        entry.profiles.join(", ")
    };
    let detail = entry.detail.as_deref().unwrap_or("").dimmed().to_string();

    output::line(&format!(
        "  {} {} {:<10} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        action,
        profiles,
        detail,
    ));
}

/// Format an AuditAction as a colored string.
fn format_action(action: &AuditAction) -> String {
    match action {
        AuditAction::Init => "init".cyan().to_string(),
        AuditAction::Resolve => "resolve".blue().to_string(),
        AuditAction::Render => "render".green().to_string(),
        AuditAction::Check => "check".yellow().to_string(),
        AuditAction::Diff => "diff".yellow().to_string(),
    }
}

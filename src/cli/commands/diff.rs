use colored::Colorize;

use crate::cli::commands::layer_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::diff_result::{DiffKind, DiffResult};
use crate::core::services::diff_service::DiffService;

/// Execute the `deployfig diff <left> <right>` command.
///
/// Resolves both profiles and shows which settings were added, removed,
/// or changed going from `left` to `right`. Secret values are masked.
pub fn execute(left: &str, right: &str) -> Result<()> {
    let config_dir = crate::cli::context::require_initialized()?;
    let config = AppConfig::load(config_dir)?;

    let (left_profile, _) = layer_helpers::resolve_profile(left, &config, config_dir)?;
    let (right_profile, _) = layer_helpers::resolve_profile(right, &config, config_dir)?;

    let mut result = DiffService.diff(&left_profile.config, &right_profile.config, left, right);
    mask_secrets(&mut result, &config);

    output::header("🔍 deployfig diff");

    super::audit_helpers::log_audit(
        AuditAction::Diff,
        vec![left.to_string(), right.to_string()],
        Some(format!("{} difference(s)", result.entries.len())),
    );

    if result.is_empty() {
        output::success("No differences found");
        return Ok(());
    }

    print_diff_table(&result);
    print_diff_summary(&result);

    Ok(())
}

fn mask_secrets(result: &mut DiffResult, config: &AppConfig) {
    for entry in &mut result.entries {
        if let DiffKind::Modified {
            old_value,
            new_value,
        } = &mut entry.kind
        {
            *old_value = layer_helpers::display_value(config, &entry.key, old_value);
            *new_value = layer_helpers::display_value(config, &entry.key, new_value);
        }
    }
}

/// Print the diff results as a formatted table.
fn print_diff_table(result: &DiffResult) {
    // Calculate column widths
    let key_width = result
        .entries
        .iter()
        .map(|e| e.key.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let header = format!(
        "  {:<width$}   {:<12}   {}",
        "Setting",
        &result.left_name,
        &result.right_name,
        width = key_width
    );
    output::line(&header.bold().to_string());
    output::line(&format!("  {}", "─".repeat(header.chars().count())));

    for entry in &result.entries {
        match &entry.kind {
            DiffKind::Added => {
                output::line(&format!(
                    "  {:<width$}   {:<12}   {}",
                    entry.key.green(),
                    "—".dimmed(),
                    "(added)".green(),
                    width = key_width
                ));
            }
            DiffKind::Removed => {
                output::line(&format!(
                    "  {:<width$}   {:<12}   {}",
                    entry.key.red(),
                    "(removed)".red(),
                    "—".dimmed(),
                    width = key_width
                ));
            }
            DiffKind::Modified {
                old_value,
                new_value,
            } => {
                // Truncate long values for readability
                let old_display = truncate(old_value, 12);
                let new_display = truncate(new_value, 12);
                output::line(&format!(
                    "  {:<width$}   {:<12}   {}",
                    entry.key.yellow(),
                    old_display,
                    new_display.yellow(),
                    width = key_width
                ));
            }
        }
    }
}

/// Print a summary line below the table.
fn print_diff_summary(result: &DiffResult) {
    let added = result
        .entries
        .iter()
        .filter(|e| matches!(e.kind, DiffKind::Added))
        .count();
    let removed = result
        .entries
        .iter()
        .filter(|e| matches!(e.kind, DiffKind::Removed))
        .count();
    let modified = result
        .entries
        .iter()
        .filter(|e| matches!(e.kind, DiffKind::Modified { .. }))
        .count();

    let mut parts = Vec::new();
    if added > 0 {
        parts.push(format!("{added} added"));
    }
    if removed > 0 {
        parts.push(format!("{removed} removed"));
    }
    if modified > 0 {
        parts.push(format!("{modified} modified"));
    }

    output::line("");
    output::success(&parts.join(", "));
}

/// Truncate a string to `max_len` characters, appending "..." if needed.
/// Uses char boundaries to avoid panic on multibyte UTF-8 sequences.
fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let limit = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(limit).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world!", 8), "hello...");
    }

    #[test]
    fn truncate_unicode_safe() {
        // "ñ" is two bytes
        assert_eq!(truncate("contraseña", 8), "contr...");
    }

    #[test]
    fn truncate_empty_string() {
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn truncate_max_len_zero() {
        assert_eq!(truncate("hello", 0), "...");
    }
}

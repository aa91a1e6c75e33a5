use std::process::Command;

use chrono::Utc;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::models::audit_entry::{AuditAction, AuditEntry};
use crate::core::traits::audit::AuditLogger;

/// Read the git user name and email from the local/global config.
/// Returns `("unknown", None)` if git is not available.
pub fn git_author() -> (String, Option<String>) {
    let read = |field: &str| -> Option<String> {
        Command::new("git")
            .args(["config", field])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let name = read("user.name").unwrap_or_else(|| "unknown".to_string());
    (name, read("user.email"))
}

/// Record an audit event. Warns on failure instead of propagating
/// the error; the audit trail never blocks the main operation.
pub fn log_audit(action: AuditAction, profiles: Vec<String>, detail: Option<String>) {
    let config_dir = crate::cli::context::config_dir();
    let Ok(config) = AppConfig::load(config_dir) else {
        return;
    };
    if !config.audit_enabled() {
        return;
    }

    let logger = JsonAuditLogger::for_project(config_dir, &config);
    let (author, email) = git_author();

    let entry = AuditEntry {
        timestamp: Utc::now(),
        author,
        email,
        action,
        profiles,
        detail,
    };

    if let Err(e) = logger.record(&entry) {
        output::warning(&format!("Could not write audit log: {e}"));
    }
}

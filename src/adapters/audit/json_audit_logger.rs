use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::app_config::AppConfig;
use crate::core::errors::{DeployfigError, Result};
use crate::core::models::audit_entry::{AuditEntry, AuditFilter};
use crate::core::traits::audit::AuditLogger;

/// Audit history kept as JSON lines next to the profile layers.
///
/// Recording only ever appends one line, so concurrent runs on the same
/// host interleave whole entries.
pub struct JsonAuditLogger {
    log_path: PathBuf,
}

impl JsonAuditLogger {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    /// The log configured for the project rooted at `config_dir`.
    pub fn for_project(config_dir: &Path, config: &AppConfig) -> Self {
        Self::new(config_dir.join(config.audit_log_file()))
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn error(&self, what: String) -> DeployfigError {
        DeployfigError::AuditError {
            detail: format!("{} ({})", what, self.log_path.display()),
        }
    }
}

impl AuditLogger for JsonAuditLogger {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| self.error(format!("cannot encode entry: {e}")))?;

        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| self.error(format!("cannot open log: {e}")))?;
        writeln!(file, "{line}").map_err(|e| self.error(format!("cannot append entry: {e}")))?;

        debug!(action = ?entry.action, profiles = ?entry.profiles, "audit entry recorded");
        Ok(())
    }

    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let content = match fs::read_to_string(&self.log_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.error(format!("cannot read log: {e}"))),
        };

        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(line)
                .map_err(|e| self.error(format!("malformed entry on line {}: {e}", idx + 1)))?;
            if filter.matches(&entry) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::audit_entry::AuditAction;
    use chrono::Utc;
    use tempfile::TempDir;

    fn entry(action: AuditAction, profile: &str) -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            author: "Alice".to_string(),
            email: Some("alice@example.com".to_string()),
            action,
            profiles: vec![profile.to_string()],
            detail: None,
        }
    }

    #[test]
    fn record_then_query_in_order() {
        let tmp = TempDir::new().unwrap();
        let logger = JsonAuditLogger::new(tmp.path().join("audit.log"));

        logger.record(&entry(AuditAction::Resolve, "local")).unwrap();
        logger.record(&entry(AuditAction::Render, "production")).unwrap();

        let all = logger.query(&AuditFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].action, AuditAction::Resolve);
        assert_eq!(all[1].profiles, vec!["production"]);

        let raw = fs::read_to_string(logger.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.contains("\"action\":\"render\""));
    }

    #[test]
    fn query_applies_profile_filter() {
        let tmp = TempDir::new().unwrap();
        let logger = JsonAuditLogger::new(tmp.path().join("audit.log"));

        logger.record(&entry(AuditAction::Check, "local")).unwrap();
        logger.record(&entry(AuditAction::Check, "production")).unwrap();

        let filter = AuditFilter {
            profile: Some("production".to_string()),
            ..Default::default()
        };
        let hits = logger.query(&filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].profiles, vec!["production"]);
    }

    #[test]
    fn record_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let logger = JsonAuditLogger::new(tmp.path().join("nested/audit.log"));

        logger.record(&entry(AuditAction::Init, "base")).unwrap();

        assert!(logger.path().exists());
    }

    #[test]
    fn missing_log_is_empty_history() {
        let tmp = TempDir::new().unwrap();
        let logger = JsonAuditLogger::new(tmp.path().join("audit.log"));

        assert!(logger.query(&AuditFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn malformed_line_is_reported_with_its_number() {
        let tmp = TempDir::new().unwrap();
        let logger = JsonAuditLogger::new(tmp.path().join("audit.log"));
        logger.record(&entry(AuditAction::Diff, "local")).unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "not json").unwrap();

        let err = logger.query(&AuditFilter::default()).unwrap_err().to_string();
        assert!(err.contains("line 2"), "{err}");
        assert!(err.contains("audit.log"), "{err}");
    }
}

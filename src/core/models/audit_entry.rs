use serde::{Deserialize, Serialize};

/// Actions that get recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Init,
    Resolve,
    Render,
    Check,
    Diff,
}

/// A single entry in the audit log (JSON lines format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub author: String,
    pub email: Option<String>,
    pub action: AuditAction,
    pub profiles: Vec<String>,
    pub detail: Option<String>,
}

/// Narrows an audit query. Unset fields match every entry.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Case-insensitive substring of the author name or email.
    pub author: Option<String>,
    /// Only entries that touched this profile.
    pub profile: Option<String>,
    pub since: Option<chrono::DateTime<chrono::Utc>>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        let by_author = self.author.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            entry.author.to_lowercase().contains(&needle)
                || entry
                    .email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&needle))
        });
        let by_profile = self
            .profile
            .as_deref()
            .is_none_or(|p| entry.profiles.iter().any(|e| e == p));
        let by_date = self.since.is_none_or(|s| entry.timestamp >= s);

        by_author && by_profile && by_date
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.profile.is_none() && self.since.is_none()
    }
}

use crate::core::errors::Result;
use crate::core::models::audit_entry::{AuditEntry, AuditFilter};

/// Storage for the operation history of a project.
pub trait AuditLogger {
    fn record(&self, entry: &AuditEntry) -> Result<()>;

    /// Entries matching `filter`, oldest first.
    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>>;
}

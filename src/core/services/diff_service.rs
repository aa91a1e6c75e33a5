use std::collections::BTreeSet;

use crate::core::models::diff_result::{DiffEntry, DiffKind, DiffResult};
use crate::core::models::resolved_config::ResolvedConfig;

/// Compares two resolved profiles and produces a structured diff.
pub struct DiffService;

impl DiffService {
    /// Compare two `ResolvedConfig`s and return their differences.
    ///
    /// - Keys only in `left` are `Removed`
    /// - Keys only in `right` are `Added`
    /// - Keys in both with different values are `Modified`
    /// - Keys in both with the same value are omitted
    ///
    /// Results are sorted alphabetically by key.
    pub fn diff(
        &self,
        left: &ResolvedConfig,
        right: &ResolvedConfig,
        left_name: &str,
        right_name: &str,
    ) -> DiffResult {
        let left_keys: BTreeSet<&str> = left.keys().into_iter().collect();
        let right_keys: BTreeSet<&str> = right.keys().into_iter().collect();

        let mut entries = Vec::new();

        for key in left_keys.union(&right_keys) {
            let kind = match (left.get(key), right.get(key)) {
                (Some(_), None) => DiffKind::Removed,
                (None, Some(_)) => DiffKind::Added,
                (Some(old), Some(new)) if old != new => DiffKind::Modified {
                    old_value: old.to_string(),
                    new_value: new.to_string(),
                },
                _ => continue,
            };
            entries.push(DiffEntry {
                key: key.to_string(),
                kind,
            });
        }

        DiffResult {
            left_name: left_name.to_string(),
            right_name: right_name.to_string(),
            entries,
        }
    }
}

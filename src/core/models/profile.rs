use super::resolved_config::ResolvedConfig;

/// A profile (local, production, ...) after its layers were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub name: String,
    pub config: ResolvedConfig,
    /// Layer names in application order, base first.
    pub layers: Vec<String>,
}

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::errors::{DeployfigError, Result};

/// Top-level Deployfig configuration read from `.deployfig/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub deployfig: DeployfigSection,
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub secrets: SecretsSection,
    pub audit: Option<AuditSection>,
}

impl AppConfig {
    /// Load the configuration from `{config_dir}/config.toml`.
    ///
    /// After parsing, validates profile names and the audit log filename
    /// so a hand-edited config cannot point layer files outside the
    /// config directory.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Err(DeployfigError::InvalidConfig {
                detail: "config.toml not found. Run 'deployfig init' first.".into(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(
            path = %config_path.display(),
            profiles = config.profiles.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parse and validate config content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DeployfigError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.deployfig.format_version > CURRENT_FORMAT_VERSION {
            return Err(DeployfigError::FormatVersionTooNew {
                project_version: self.deployfig.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        for (name, entry) in &self.profiles {
            crate::cli::context::validate_profile_name(name)?;
            if let Some(file) = &entry.file {
                crate::cli::context::validate_simple_filename(file, "layer file")?;
            }
        }

        let base = &self.deployfig.base_profile;
        match self.profiles.get(base) {
            None => {
                return Err(DeployfigError::InvalidConfig {
                    detail: format!("base profile '{base}' is not declared in [profiles]"),
                });
            }
            Some(entry) if entry.standalone => {
                return Err(DeployfigError::InvalidConfig {
                    detail: format!("base profile '{base}' cannot be standalone"),
                });
            }
            Some(_) => {}
        }

        if let Some(audit) = &self.audit {
            crate::cli::context::validate_simple_filename(&audit.log_file, "audit log file")?;
        }

        Ok(())
    }

    /// Get the layer file name for a profile, defaulting to `{name}.env`.
    pub fn layer_file_name(&self, name: &str) -> String {
        self.profiles
            .get(name)
            .and_then(|p| p.file.clone())
            .unwrap_or_else(|| format!("{name}.env"))
    }

    pub fn layer_path(&self, config_dir: &Path, name: &str) -> PathBuf {
        config_dir.join(self.layer_file_name(name))
    }

    pub fn is_base(&self, name: &str) -> bool {
        self.deployfig.base_profile == name
    }

    pub fn is_production(&self, name: &str) -> bool {
        self.deployfig.production_profile == name
    }

    pub fn is_secret(&self, key: &str) -> bool {
        self.secrets.keys.iter().any(|k| k == key)
    }

    /// Comma-separated list of declared profiles, for error messages.
    pub fn available_profiles(&self) -> String {
        self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }

    /// Auditing is on unless an `[audit]` section turns it off.
    pub fn audit_enabled(&self) -> bool {
        self.audit.as_ref().is_none_or(|a| a.enabled)
    }

    pub fn audit_log_file(&self) -> &str {
        self.audit
            .as_ref()
            .map_or(DEFAULT_AUDIT_LOG, |a| a.log_file.as_str())
    }
}

const DEFAULT_AUDIT_LOG: &str = "audit.log";

/// Current format version supported by this build of Deployfig.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// The `[deployfig]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployfigSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default = "default_base_profile")]
    pub base_profile: String,
    /// The profile held to the production deployment rules in `check`.
    #[serde(default = "default_production_profile")]
    pub production_profile: String,
}

fn default_format_version() -> u32 {
    1
}

fn default_base_profile() -> String {
    "base".to_string()
}

fn default_production_profile() -> String {
    "production".to_string()
}

/// A profile entry in `[profiles]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileEntry {
    pub file: Option<String>,
    /// A standalone profile does not extend the base profile.
    #[serde(default)]
    pub standalone: bool,
}

/// The `[secrets]` section: keys that are injected, never committed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsSection {
    #[serde(default)]
    pub keys: Vec<String>,
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSection {
    pub enabled: bool,
    pub log_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[deployfig]
version = "0.1.0"

[profiles]
base = {}
local = { file = "dev.env" }
scratch = { standalone = true }
"#;

    #[test]
    fn parse_applies_defaults() {
        let config = AppConfig::parse(MINIMAL).unwrap();

        assert_eq!(config.deployfig.format_version, 1);
        assert_eq!(config.deployfig.base_profile, "base");
        assert_eq!(config.deployfig.production_profile, "production");
        assert!(config.secrets.keys.is_empty());
        assert!(config.audit.is_none());
    }

    #[test]
    fn layer_file_name_defaults_to_profile_name() {
        let config = AppConfig::parse(MINIMAL).unwrap();

        assert_eq!(config.layer_file_name("base"), "base.env");
        assert_eq!(config.layer_file_name("local"), "dev.env");
        assert!(config.profiles["scratch"].standalone);
    }

    #[test]
    fn audit_defaults_on_with_standard_log() {
        let config = AppConfig::parse(MINIMAL).unwrap();
        assert!(config.audit_enabled());
        assert_eq!(config.audit_log_file(), "audit.log");

        let off = AppConfig::parse(&format!(
            "{MINIMAL}\n[audit]\nenabled = false\nlog_file = \"history.log\"\n"
        ))
        .unwrap();
        assert!(!off.audit_enabled());
        assert_eq!(off.audit_log_file(), "history.log");
    }

    #[test]
    fn undeclared_base_profile_rejected() {
        let content = r#"
[deployfig]
version = "0.1.0"
base_profile = "common"

[profiles]
base = {}
"#;
        let err = AppConfig::parse(content).unwrap_err().to_string();
        assert!(err.contains("common"));
    }

    #[test]
    fn standalone_base_rejected() {
        let content = r#"
[deployfig]
version = "0.1.0"

[profiles]
base = { standalone = true }
"#;
        let err = AppConfig::parse(content).unwrap_err().to_string();
        assert!(err.contains("cannot be standalone"));
    }

    #[test]
    fn newer_format_version_rejected() {
        let content = r#"
[deployfig]
version = "9.0.0"
format_version = 2

[profiles]
base = {}
"#;
        let err = AppConfig::parse(content).unwrap_err();
        assert!(matches!(err, DeployfigError::FormatVersionTooNew { .. }));
    }

    #[test]
    fn traversal_in_layer_file_rejected() {
        let content = r#"
[deployfig]
version = "0.1.0"

[profiles]
base = { file = "../../etc/passwd" }
"#;
        assert!(AppConfig::parse(content).is_err());
    }

    #[test]
    fn secrets_lookup() {
        let content = r#"
[deployfig]
version = "0.1.0"

[profiles]
base = {}

[secrets]
keys = ["SECRET_KEY"]
"#;
        let config = AppConfig::parse(content).unwrap();
        assert!(config.is_secret("SECRET_KEY"));
        assert!(!config.is_secret("DEBUG"));
    }
}

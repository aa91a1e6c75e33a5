use std::collections::HashMap;

use crate::config::app_config::AppConfig;
use crate::core::models::layer_file::LayerFile;
use crate::core::models::lint::{Finding, LintReport, Severity};
use crate::core::models::profile::ResolvedProfile;
use crate::core::models::resolved_config::{Origin, ResolvedConfig};

/// Hardening flags that must resolve to true in production.
const SECURE_FLAGS: &[&str] = &[
    "SECURE_SSL_REDIRECT",
    "SESSION_COOKIE_SECURE",
    "CSRF_COOKIE_SECURE",
];

/// Checks a resolved profile for unsafe deployment settings.
pub struct LintService;

impl LintService {
    /// Lint `profile` and return every finding, errors first.
    ///
    /// `files` are the committed layer files the profile was built from;
    /// they are scanned for secret values that should have been injected.
    pub fn lint(
        &self,
        profile: &ResolvedProfile,
        config: &AppConfig,
        files: &HashMap<String, LayerFile>,
    ) -> LintReport {
        let mut findings = Vec::new();

        if config.is_production(&profile.name) {
            Self::check_debug(&profile.config, &mut findings);
            Self::check_hosts(&profile.config, &mut findings);
            Self::check_secure_flags(&profile.config, &mut findings);
        }
        Self::check_secrets(profile, config, files, &mut findings);

        findings.sort_by(|a, b| b.severity.cmp(&a.severity));

        LintReport {
            profile: profile.name.clone(),
            findings,
        }
    }

    fn check_debug(config: &ResolvedConfig, findings: &mut Vec<Finding>) {
        let message = match config.get_bool("DEBUG") {
            Ok(Some(false)) => return,
            Ok(Some(true)) => "DEBUG is enabled; error pages would leak internals".to_string(),
            Ok(None) => "DEBUG is not set; production must disable it explicitly".to_string(),
            Err(e) => e.to_string(),
        };
        findings.push(Finding {
            severity: Severity::Error,
            key: "DEBUG".to_string(),
            message,
        });
    }

    fn check_hosts(config: &ResolvedConfig, findings: &mut Vec<Finding>) {
        let hosts = config.get_list("ALLOWED_HOSTS").unwrap_or_default();

        if hosts.is_empty() {
            findings.push(Finding {
                severity: Severity::Warning,
                key: "ALLOWED_HOSTS".to_string(),
                message: "ALLOWED_HOSTS is empty; list the hostnames this site serves".to_string(),
            });
            return;
        }

        for host in hosts.iter().filter(|h| is_wildcard(h)) {
            findings.push(Finding {
                severity: Severity::Warning,
                key: "ALLOWED_HOSTS".to_string(),
                message: format!("ALLOWED_HOSTS contains wildcard '{host}'; spoofed Host headers would be accepted"),
            });
        }
    }

    fn check_secure_flags(config: &ResolvedConfig, findings: &mut Vec<Finding>) {
        for key in SECURE_FLAGS {
            let message = match config.get_bool(key) {
                Ok(Some(true)) => continue,
                Ok(_) => format!("{key} is not enabled"),
                Err(e) => e.to_string(),
            };
            findings.push(Finding {
                severity: Severity::Warning,
                key: key.to_string(),
                message,
            });
        }
    }

    fn check_secrets(
        profile: &ResolvedProfile,
        config: &AppConfig,
        files: &HashMap<String, LayerFile>,
        findings: &mut Vec<Finding>,
    ) {
        for key in &config.secrets.keys {
            for layer_name in &profile.layers {
                // Earlier values stay in history even when a later entry blanks them.
                let committed = files.get(layer_name).is_some_and(|f| {
                    f.entries()
                        .any(|e| e.key == *key && !e.value.is_empty())
                });
                if committed {
                    findings.push(Finding {
                        severity: Severity::Error,
                        key: key.clone(),
                        message: format!(
                            "secret {key} has a value in committed layer '{}'; inject it from the environment instead",
                            config.layer_file_name(layer_name)
                        ),
                    });
                }
            }

            if profile.config.origin(key) != Some(&Origin::Environment) {
                findings.push(Finding {
                    severity: Severity::Warning,
                    key: key.clone(),
                    message: format!("secret {key} is not set in the environment"),
                });
            }
        }
    }
}

fn is_wildcard(host: &str) -> bool {
    host == "*" || host == "." || host.starts_with('*')
}

use std::path::PathBuf;

use crate::core::errors::{DeployfigError, Result};
use crate::core::models::profile::ResolvedProfile;
use crate::core::models::resolved_config::ResolvedConfig;

const DEFAULT_CHMOD_SOCKET: u32 = 0o666;
const DEFAULT_PROCESSES: u32 = 4;
const DEFAULT_LISTEN_PORT: u16 = 80;
const DEFAULT_TLS_LISTEN_PORT: u16 = 443;
const DEFAULT_TLS_DAYS: u32 = 365;

/// Certificate paths for the HTTPS server block.
#[derive(Debug, Clone, PartialEq)]
pub struct TlsSettings {
    pub certificate: PathBuf,
    pub certificate_key: PathBuf,
    pub listen_port: u16,
    pub days: u32,
}

/// A URL prefix served straight from disk by the reverse proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMount {
    pub url: String,
    pub root: PathBuf,
}

/// The typed values the uWSGI and NGINX renderers need.
///
/// Built from a resolved profile; this is the first consumer of the
/// raw strings, so malformed values surface here.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploySettings {
    pub profile: String,
    pub project_name: String,
    pub project_dir: PathBuf,
    pub virtualenv: PathBuf,
    pub wsgi_module: String,
    pub settings_module: String,
    pub socket: PathBuf,
    pub chmod_socket: u32,
    pub processes: u32,
    pub upstream_name: String,
    pub hosts: Vec<String>,
    pub listen_port: u16,
    pub static_mount: Option<StaticMount>,
    pub media_mount: Option<StaticMount>,
    pub tls: Option<TlsSettings>,
}

impl DeploySettings {
    pub fn from_resolved(profile: &ResolvedProfile) -> Result<Self> {
        let config = &profile.config;
        let require = |key: &str| -> Result<String> {
            match config.get(key).map(str::trim) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(DeployfigError::MissingSetting {
                    key: key.to_string(),
                    profile: profile.name.clone(),
                }),
            }
        };
        let optional = |key: &str| -> Option<String> {
            config
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let project_name = require("PROJECT_NAME")?;
        let project_dir = PathBuf::from(require("PROJECT_DIR")?);
        let virtualenv = PathBuf::from(require("VIRTUALENV")?);

        let hosts = config.get_list("ALLOWED_HOSTS").unwrap_or_default();
        if hosts.is_empty() {
            return Err(DeployfigError::MissingSetting {
                key: "ALLOWED_HOSTS".to_string(),
                profile: profile.name.clone(),
            });
        }

        let processes = config.get_u32("UWSGI_PROCESSES")?.unwrap_or(DEFAULT_PROCESSES);
        if processes == 0 {
            return Err(DeployfigError::InvalidValue {
                key: "UWSGI_PROCESSES".to_string(),
                value: "0".to_string(),
                expected: "at least one worker process".to_string(),
            });
        }

        let static_mount = Self::mount(config, "STATIC_URL", "/static/", "STATIC_ROOT")?;
        let media_mount = Self::mount(config, "MEDIA_URL", "/media/", "MEDIA_ROOT")?;

        let tls = match (optional("TLS_CERTIFICATE"), optional("TLS_CERTIFICATE_KEY")) {
            (Some(certificate), Some(certificate_key)) => Some(TlsSettings {
                certificate: certificate.into(),
                certificate_key: certificate_key.into(),
                listen_port: config
                    .get_port("TLS_LISTEN_PORT")?
                    .unwrap_or(DEFAULT_TLS_LISTEN_PORT),
                days: config.get_u32("TLS_DAYS")?.unwrap_or(DEFAULT_TLS_DAYS),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(DeployfigError::MissingSetting {
                    key: "TLS_CERTIFICATE_KEY".to_string(),
                    profile: profile.name.clone(),
                });
            }
            (None, Some(_)) => {
                return Err(DeployfigError::MissingSetting {
                    key: "TLS_CERTIFICATE".to_string(),
                    profile: profile.name.clone(),
                });
            }
        };

        Ok(Self {
            profile: profile.name.clone(),
            wsgi_module: optional("WSGI_MODULE")
                .unwrap_or_else(|| format!("{project_name}.wsgi:application")),
            settings_module: optional("SETTINGS_MODULE")
                .unwrap_or_else(|| format!("{project_name}.settings.{}", profile.name)),
            socket: optional("UWSGI_SOCKET")
                .map(PathBuf::from)
                .unwrap_or_else(|| project_dir.join(format!("{project_name}.sock"))),
            chmod_socket: config
                .get_octal("UWSGI_CHMOD_SOCKET")?
                .unwrap_or(DEFAULT_CHMOD_SOCKET),
            processes,
            upstream_name: optional("UPSTREAM_NAME").unwrap_or_else(|| project_name.clone()),
            hosts,
            listen_port: config.get_port("LISTEN_PORT")?.unwrap_or(DEFAULT_LISTEN_PORT),
            static_mount,
            media_mount,
            tls,
            project_name,
            project_dir,
            virtualenv,
        })
    }

    /// A mount exists only when its root directory is configured.
    fn mount(
        config: &ResolvedConfig,
        url_key: &str,
        default_url: &str,
        root_key: &str,
    ) -> Result<Option<StaticMount>> {
        let Some(root) = config.get(root_key).map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(None);
        };
        let url = config
            .get(url_key)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(default_url);
        if !url.starts_with('/') {
            return Err(DeployfigError::InvalidValue {
                key: url_key.to_string(),
                value: url.to_string(),
                expected: "a path prefix starting with '/'".to_string(),
            });
        }
        Ok(Some(StaticMount {
            url: url.to_string(),
            root: PathBuf::from(root),
        }))
    }
}

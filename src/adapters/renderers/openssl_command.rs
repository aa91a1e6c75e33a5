use crate::core::errors::{DeployfigError, Result};
use crate::core::services::deploy_settings::DeploySettings;
use crate::core::traits::renderer::Renderer;

/// Renders the `openssl` invocation that produces the self-signed
/// certificate and private key the NGINX site points at.
///
/// The command is printed for the operator to run; nothing is executed.
pub struct OpensslCommandRenderer;

impl Renderer for OpensslCommandRenderer {
    fn name(&self) -> &str {
        "tls"
    }

    fn default_file_name(&self, settings: &DeploySettings) -> String {
        format!("make-cert-{}.sh", settings.profile)
    }

    fn render(&self, settings: &DeploySettings) -> Result<String> {
        let tls = settings
            .tls
            .as_ref()
            .ok_or_else(|| DeployfigError::MissingSetting {
                key: "TLS_CERTIFICATE".to_string(),
                profile: settings.profile.clone(),
            })?;

        let common_name = settings
            .hosts
            .iter()
            .find(|h| h.as_str() != "*")
            .map(|h| h.trim_start_matches('.'))
            .unwrap_or("localhost");

        let cert_dir = tls
            .certificate
            .parent()
            .map(|p| p.display().to_string())
            .filter(|p| !p.is_empty());

        let mut out = String::from("#!/bin/sh\n");
        out.push_str(&format!(
            "# Self-signed certificate for {} ({} profile)\n",
            settings.project_name, settings.profile
        ));
        out.push_str("set -e\n");
        if let Some(dir) = cert_dir {
            out.push_str(&format!("mkdir -p {}\n", shell_quote(&dir)));
        }
        out.push_str(&format!(
            "openssl req -x509 -nodes -days {} -newkey rsa:2048 \\\n  \
             -keyout {} \\\n  \
             -out {} \\\n  \
             -subj {}\n",
            tls.days,
            shell_quote(&tls.certificate_key.display().to_string()),
            shell_quote(&tls.certificate.display().to_string()),
            shell_quote(&format!("/CN={common_name}")),
        ));
        Ok(out)
    }
}

/// Single-quote a word for POSIX shells when it contains anything
/// outside a conservative safe set.
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-=:".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::deploy_settings::tests::make_profile;

    fn settings(extra: &[(&str, &str)]) -> DeploySettings {
        let mut pairs = vec![
            ("PROJECT_NAME", "mysite"),
            ("PROJECT_DIR", "/srv/mysite"),
            ("VIRTUALENV", "/srv/env/mysite"),
            ("ALLOWED_HOSTS", "*,.example.com"),
        ];
        pairs.extend_from_slice(extra);
        DeploySettings::from_resolved(&make_profile("production", &pairs)).unwrap()
    }

    #[test]
    fn renders_openssl_invocation() {
        let script = OpensslCommandRenderer
            .render(&settings(&[
                ("TLS_CERTIFICATE", "/srv/mysite/ssl/mysite.crt"),
                ("TLS_CERTIFICATE_KEY", "/srv/mysite/ssl/mysite.key"),
                ("TLS_DAYS", "30"),
            ]))
            .unwrap();

        let expected = "\
#!/bin/sh
# Self-signed certificate for mysite (production profile)
set -e
mkdir -p /srv/mysite/ssl
openssl req -x509 -nodes -days 30 -newkey rsa:2048 \\
  -keyout /srv/mysite/ssl/mysite.key \\
  -out /srv/mysite/ssl/mysite.crt \\
  -subj /CN=example.com
";
        assert_eq!(script, expected);
    }

    #[test]
    fn requires_tls_paths() {
        let err = OpensslCommandRenderer.render(&settings(&[])).unwrap_err();

        assert!(err.to_string().contains("TLS_CERTIFICATE"));
    }

    #[test]
    fn quotes_unsafe_words() {
        assert_eq!(shell_quote("/srv/my site/x.key"), "'/srv/my site/x.key'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote("/CN=example.com"), "/CN=example.com");
    }
}

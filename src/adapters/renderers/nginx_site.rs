use tracing::debug;

use crate::core::errors::Result;
use crate::core::services::deploy_settings::{DeploySettings, StaticMount, TlsSettings};
use crate::core::traits::renderer::Renderer;

const INDENT: &str = "    ";

/// Renders the NGINX site file: one upstream bound to the uWSGI socket
/// and the server block(s) routing to it.
///
/// Without TLS there is a single plain-HTTP server. With TLS the plain
/// server only redirects, and the HTTPS server carries the routes.
pub struct NginxSiteRenderer;

impl Renderer for NginxSiteRenderer {
    fn name(&self) -> &str {
        "nginx"
    }

    fn default_file_name(&self, settings: &DeploySettings) -> String {
        format!("nginx-{}.conf", settings.profile)
    }

    fn render(&self, settings: &DeploySettings) -> Result<String> {
        let server_names = server_names(&settings.hosts);

        let mut out = format!(
            "# NGINX site for {} ({} profile)\n\
             upstream {} {{\n\
             {INDENT}server unix://{};\n\
             }}\n",
            settings.project_name,
            settings.profile,
            settings.upstream_name,
            settings.socket.display(),
        );

        match &settings.tls {
            None => {
                out.push('\n');
                out.push_str(&server_block(
                    settings,
                    &format!("listen {}", settings.listen_port),
                    &server_names,
                    None,
                ));
            }
            Some(tls) => {
                out.push('\n');
                out.push_str(&format!(
                    "server {{\n\
                     {INDENT}listen {};\n\
                     {INDENT}server_name {server_names};\n\
                     {INDENT}return 301 https://$host$request_uri;\n\
                     }}\n",
                    settings.listen_port,
                ));
                out.push('\n');
                out.push_str(&server_block(
                    settings,
                    &format!("listen {} ssl", tls.listen_port),
                    &server_names,
                    Some(tls),
                ));
            }
        }

        debug!(
            profile = %settings.profile,
            tls = settings.tls.is_some(),
            "rendered nginx site"
        );
        Ok(out)
    }
}

fn server_block(
    settings: &DeploySettings,
    listen: &str,
    server_names: &str,
    tls: Option<&TlsSettings>,
) -> String {
    let mut block = format!(
        "server {{\n\
         {INDENT}{listen};\n\
         {INDENT}server_name {server_names};\n"
    );

    if let Some(tls) = tls {
        block.push_str(&format!(
            "{INDENT}ssl_certificate {};\n\
             {INDENT}ssl_certificate_key {};\n",
            tls.certificate.display(),
            tls.certificate_key.display(),
        ));
    }

    for mount in [&settings.static_mount, &settings.media_mount]
        .into_iter()
        .flatten()
    {
        block.push('\n');
        block.push_str(&alias_location(mount));
    }

    block.push_str(&format!(
        "\n\
         {INDENT}location / {{\n\
         {INDENT}{INDENT}include uwsgi_params;\n\
         {INDENT}{INDENT}uwsgi_pass {};\n\
         {INDENT}}}\n\
         }}\n",
        settings.upstream_name,
    ));
    block
}

/// `alias` maps the prefix onto the directory, so both sides must agree
/// on the trailing slash.
fn alias_location(mount: &StaticMount) -> String {
    let root = mount.root.display().to_string();
    let root = root.trim_end_matches('/');
    let alias = if mount.url.ends_with('/') {
        format!("{root}/")
    } else {
        root.to_string()
    };
    format!(
        "{INDENT}location {} {{\n\
         {INDENT}{INDENT}alias {alias};\n\
         {INDENT}}}\n",
        mount.url,
    )
}

/// Hostnames for `server_name`. A bare `*` becomes NGINX's catch-all `_`.
fn server_names(hosts: &[String]) -> String {
    hosts
        .iter()
        .map(|h| if h == "*" { "_" } else { h.as_str() })
        .collect::<Vec<_>>()
        .join(" ")
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
            ("ALLOWED_HOSTS", "example.com,www.example.com"),
            ("STATIC_ROOT", "/srv/mysite/static"),
            ("MEDIA_ROOT", "/srv/mysite/media/"),
        ];
        pairs.extend_from_slice(extra);
        DeploySettings::from_resolved(&make_profile("production", &pairs)).unwrap()
    }

    #[test]
    fn renders_plain_http_site() {
        let conf = NginxSiteRenderer.render(&settings(&[])).unwrap();

        let expected = "\
# NGINX site for mysite (production profile)
upstream mysite {
    server unix:///srv/mysite/mysite.sock;
}

server {
    listen 80;
    server_name example.com www.example.com;

    location /static/ {
        alias /srv/mysite/static/;
    }

    location /media/ {
        alias /srv/mysite/media/;
    }

    location / {
        include uwsgi_params;
        uwsgi_pass mysite;
    }
}
";
        assert_eq!(conf, expected);
    }

    #[test]
    fn tls_adds_redirect_and_ssl_server() {
        let conf = NginxSiteRenderer
            .render(&settings(&[
                ("TLS_CERTIFICATE", "/srv/mysite/ssl/mysite.crt"),
                ("TLS_CERTIFICATE_KEY", "/srv/mysite/ssl/mysite.key"),
            ]))
            .unwrap();

        assert!(conf.contains("    listen 80;\n"));
        assert!(conf.contains("return 301 https://$host$request_uri;"));
        assert!(conf.contains("    listen 443 ssl;\n"));
        assert!(conf.contains("ssl_certificate /srv/mysite/ssl/mysite.crt;"));
        assert!(conf.contains("ssl_certificate_key /srv/mysite/ssl/mysite.key;"));
        assert_eq!(conf.matches("uwsgi_pass mysite;").count(), 1);
    }

    #[test]
    fn wildcard_host_becomes_catch_all() {
        assert_eq!(
            server_names(&["*".to_string(), ".example.com".to_string()]),
            "_ .example.com"
        );
    }

    #[test]
    fn alias_without_trailing_slash() {
        let mount = StaticMount {
            url: "/assets".to_string(),
            root: "/srv/assets/".into(),
        };

        assert_eq!(
            alias_location(&mount),
            "    location /assets {\n        alias /srv/assets;\n    }\n"
        );
    }
}

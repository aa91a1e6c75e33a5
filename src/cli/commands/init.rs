use std::io::Write;
use std::path::Path;

use regex::Regex;

use crate::cli::output;
use crate::core::errors::{DeployfigError, Result};
use crate::core::models::audit_entry::AuditAction;

/// Execute the `deployfig init` command.
///
/// Creates the config directory with a base profile and two profiles
/// extending it: `local` for development and `production` with safe
/// defaults already in place.
pub fn execute(project: &str, verbose: bool) -> Result<()> {
    let config_dir = crate::cli::context::config_dir();

    if config_dir.exists() {
        return Err(DeployfigError::InvalidConfig {
            detail: format!(
                "Deployfig is already initialized in this project ({}/ exists)",
                config_dir.display()
            ),
        });
    }

    validate_project_name(project)?;

    output::header("Deployfig: initializing project");

    std::fs::create_dir_all(config_dir)?;
    output::success(&format!("Created {}/", config_dir.display()));

    std::fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    output::success("Generated config.toml with profiles base, local, production");

    std::fs::write(config_dir.join("base.env"), base_layer(project))?;
    std::fs::write(config_dir.join("local.env"), LOCAL_LAYER)?;
    std::fs::write(config_dir.join("production.env"), production_layer(project))?;
    output::success("Created layer files base.env, local.env, production.env");

    add_to_gitignore(".env")?;

    super::audit_helpers::log_audit(
        AuditAction::Init,
        vec![],
        Some(format!("project {project}")),
    );

    output::success("Project ready.\n");
    print_next_steps(verbose, config_dir);

    Ok(())
}

/// The project name ends up in Python module paths.
fn validate_project_name(project: &str) -> Result<()> {
    let pattern = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex");
    if pattern.is_match(project) {
        Ok(())
    } else {
        Err(DeployfigError::InvalidConfig {
            detail: format!(
                "invalid project name '{project}': must be a Python identifier (letters, digits, '_')"
            ),
        })
    }
}

const CONFIG_TEMPLATE: &str = r#"[deployfig]
version = "0.1.0"
format_version = 1
base_profile = "base"
production_profile = "production"

[profiles]
base = { file = "base.env" }
local = { file = "local.env" }
production = { file = "production.env" }

# Injected from the process environment, never committed.
[secrets]
keys = ["SECRET_KEY", "DB_PASSWORD"]

[audit]
enabled = true
log_file = "audit.log"
"#;

fn base_layer(project: &str) -> String {
    format!(
        "# Shared settings for every profile\n\
         PROJECT_NAME={project}\n\
         PROJECT_DIR=/home/projects/{project}\n\
         VIRTUALENV=/home/env/{project}\n\
         \n\
         DEBUG=true\n\
         ALLOWED_HOSTS=*\n\
         \n\
         DB_ENGINE=django.db.backends.postgresql\n\
         DB_NAME={project}\n\
         DB_USER={project}\n\
         \n\
         STATIC_URL=/static/\n\
         MEDIA_URL=/media/\n"
    )
}

const LOCAL_LAYER: &str = "# Development on this machine\n\
DEBUG=true\n\
ALLOWED_HOSTS=localhost,127.0.0.1\n\
DB_HOST=localhost\n";

fn production_layer(project: &str) -> String {
    format!(
        "# Production overrides\n\
         DEBUG=false\n\
         ALLOWED_HOSTS=example.com,www.example.com\n\
         \n\
         STATIC_ROOT=/home/projects/{project}/static\n\
         MEDIA_ROOT=/home/projects/{project}/media\n\
         \n\
         SECURE_SSL_REDIRECT=true\n\
         SESSION_COOKIE_SECURE=true\n\
         CSRF_COOKIE_SECURE=true\n\
         \n\
         TLS_CERTIFICATE=/home/projects/{project}/ssl/{project}.crt\n\
         TLS_CERTIFICATE_KEY=/home/projects/{project}/ssl/{project}.key\n"
    )
}

/// Add an entry to .gitignore if not already present.
fn add_to_gitignore(entry: &str) -> Result<()> {
    let gitignore = Path::new(".gitignore");

    if gitignore.exists() {
        let content = std::fs::read_to_string(gitignore)?;
        if content.lines().any(|l| l.trim() == entry) {
            output::success(&format!("{entry} already in .gitignore"));
            return Ok(());
        }
        let mut file = std::fs::OpenOptions::new().append(true).open(gitignore)?;
        writeln!(file, "\n# Deployfig: resolved profiles may hold secrets\n{entry}")?;
    } else {
        std::fs::write(
            gitignore,
            format!("# Deployfig: resolved profiles may hold secrets\n{entry}\n"),
        )?;
    }

    output::success(&format!("Added {entry} to .gitignore"));
    Ok(())
}

fn print_next_steps(verbose: bool, config_dir: &Path) {
    output::line("  Next steps:");
    output::line("     1. Edit the layer files with your paths and hostnames");
    output::line("     2. export DEPLOYFIG_PROFILE=production");
    output::line("     3. Run 'deployfig check' before every deploy");
    output::line("     4. Run 'deployfig render uwsgi' and 'deployfig render nginx'");

    if verbose {
        let dir = config_dir.display();
        output::line("");
        output::line("  Files created:");
        output::line(&format!("     {dir}/config.toml     profiles, secrets, audit"));
        output::line(&format!("     {dir}/base.env        shared base layer"));
        output::line(&format!("     {dir}/local.env       development overrides"));
        output::line(&format!("     {dir}/production.env  production overrides"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::parsers::dotenv_parser::DotenvParser;
    use crate::config::app_config::AppConfig;
    use crate::core::traits::parser::ConfigParser;

    #[test]
    fn config_template_parses() {
        let config = AppConfig::parse(CONFIG_TEMPLATE).unwrap();

        assert_eq!(config.profiles.len(), 3);
        assert!(config.is_secret("SECRET_KEY"));
    }

    #[test]
    fn layer_templates_parse_without_secrets() {
        let parser = DotenvParser::default();
        for content in [base_layer("mysite"), LOCAL_LAYER.to_string(), production_layer("mysite")] {
            let layer = parser.parse(&content).unwrap();
            assert!(layer.get("SECRET_KEY").is_none());
            assert!(layer.get("DB_PASSWORD").is_none());
        }
    }

    #[test]
    fn project_name_must_be_identifier() {
        assert!(validate_project_name("mysite").is_ok());
        assert!(validate_project_name("my_site2").is_ok());
        assert!(validate_project_name("my-site").is_err());
        assert!(validate_project_name("2site").is_err());
    }
}

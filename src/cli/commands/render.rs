use crate::adapters::renderers::nginx_site::NginxSiteRenderer;
use crate::adapters::renderers::openssl_command::OpensslCommandRenderer;
use crate::adapters::renderers::uwsgi_ini::UwsgiIniRenderer;
use crate::cli::RenderTarget;
use crate::cli::commands::layer_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;
use crate::core::services::deploy_settings::DeploySettings;
use crate::core::traits::renderer::Renderer;

/// Execute the `deployfig render <target>` command.
///
/// Resolves the selected profile, reads the typed deploy settings from
/// it, and emits the artifact to stdout or to `--output`.
pub fn execute(profile: Option<&str>, target: RenderTarget, output_path: Option<&str>) -> Result<()> {
    let config_dir = crate::cli::context::require_initialized()?;
    let name = crate::cli::context::require_profile(profile)?;
    let config = AppConfig::load(config_dir)?;

    let (resolved, _) = layer_helpers::resolve_profile(name, &config, config_dir)?;
    let settings = DeploySettings::from_resolved(&resolved)?;

    let renderer: Box<dyn Renderer> = match target {
        RenderTarget::Uwsgi => Box::new(UwsgiIniRenderer),
        RenderTarget::Nginx => Box::new(NginxSiteRenderer),
        RenderTarget::Tls => Box::new(OpensslCommandRenderer),
    };
    let content = renderer.render(&settings)?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &content)?;
            output::success(&format!(
                "Rendered {} for profile {name} to {path}",
                renderer.name()
            ));
            output::line(&format!(
                "  Suggested install name: {}",
                renderer.default_file_name(&settings)
            ));
        }
        // The artifact itself is the output; quiet mode does not hide it.
        None => print!("{content}"),
    }

    super::audit_helpers::log_audit(
        AuditAction::Render,
        vec![name.to_string()],
        Some(renderer.name().to_string()),
    );

    Ok(())
}

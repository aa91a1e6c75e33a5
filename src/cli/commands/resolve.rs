use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::cli::commands::layer_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::layer_file::{LayerEntry, LayerFile, Line};
use crate::core::models::profile::ResolvedProfile;
use crate::core::traits::parser::ConfigParser;

/// Execute the `deployfig resolve` command.
///
/// Applies the selected profile's layer over the base layer, injects
/// declared secrets from the environment, and writes the result as a
/// dotenv file the application runtime can load.
pub fn execute(profile: Option<&str>, output_path: &str) -> Result<()> {
    let config_dir = crate::cli::context::require_initialized()?;
    let name = crate::cli::context::require_profile(profile)?;
    let config = AppConfig::load(config_dir)?;

    output::header(&format!("Resolving profile: {name}"));

    let (resolved, _) = layer_helpers::resolve_profile(name, &config, config_dir)?;
    output::success(&format!("Layers: {}", resolved.layers.join(" -> ")));

    let parser = DotenvParser::for_file(output_path);
    let content = parser.serialize(&to_layer_file(&resolved))?;
    std::fs::write(output_path, &content)?;

    output::success(&format!(
        "Resolved {} settings from {} layer(s)",
        resolved.config.len(),
        resolved.layers.len()
    ));
    output::success(&format!("Written to {output_path}"));
    output::line("\n  Run 'deployfig check' to lint the profile before deploying.");

    super::audit_helpers::log_audit(
        AuditAction::Resolve,
        vec![name.to_string()],
        Some(format!(
            "{} settings from {} layer(s)",
            resolved.config.len(),
            resolved.layers.len()
        )),
    );

    Ok(())
}

/// Flatten a resolved profile into a dotenv file, headed by its lineage.
fn to_layer_file(profile: &ResolvedProfile) -> LayerFile {
    let mut lines = vec![Line::Comment(format!(
        "# Resolved by deployfig: profile {} ({})",
        profile.name,
        profile.layers.join(" -> ")
    ))];
    lines.extend(
        profile
            .config
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Line::Entry(LayerEntry {
                    key: v.key.clone(),
                    value: v.value.clone(),
                    line_number: i + 2,
                })
            }),
    );
    LayerFile {
        lines,
        source_path: None,
    }
}

use colored::Colorize;

use crate::cli::commands::layer_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::resolved_config::Origin;

/// Execute the `deployfig show` command.
///
/// Prints every resolved setting with the layer it came from.
/// Secret values are masked.
pub fn execute(profile: Option<&str>) -> Result<()> {
    let config_dir = crate::cli::context::require_initialized()?;
    let name = crate::cli::context::require_profile(profile)?;
    let config = AppConfig::load(config_dir)?;

    let (resolved, _) = layer_helpers::resolve_profile(name, &config, config_dir)?;

    output::header(&format!(
        "Profile {name} ({})",
        resolved.layers.join(" -> ")
    ));

    if resolved.config.is_empty() {
        output::warning("No settings defined");
        return Ok(());
    }

    let key_width = resolved
        .config
        .keys()
        .iter()
        .map(|k| k.len())
        .max()
        .unwrap_or(8)
        .max(8);

    for value in resolved.config.values() {
        let shown = layer_helpers::display_value(&config, &value.key, &value.value);
        let origin = match &value.origin {
            Origin::Environment => value.origin.to_string().cyan().to_string(),
            Origin::Layer(_) => value.origin.to_string().dimmed().to_string(),
        };
        output::line(&format!(
            "  {:<width$}  {}  [{}]",
            value.key,
            shown,
            origin,
            width = key_width
        ));
    }

    Ok(())
}

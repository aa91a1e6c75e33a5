use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::config::app_config::AppConfig;
use crate::core::errors::{DeployfigError, Result};
use crate::core::models::layer_file::LayerFile;
use crate::core::models::profile::ResolvedProfile;
use crate::core::services::profile_resolver::ProfileResolver;
use crate::core::traits::parser::ConfigParser;

/// Read and parse each named layer from the config directory.
///
/// A missing file is fatal: resolving without a declared layer would
/// silently produce a different profile than the one on record.
pub fn load_layers(
    names: &[String],
    config: &AppConfig,
    config_dir: &Path,
) -> Result<HashMap<String, LayerFile>> {
    let mut files = HashMap::new();

    for name in names {
        if files.contains_key(name) {
            continue;
        }
        let path = config.layer_path(config_dir, name);
        if !path.exists() {
            return Err(DeployfigError::LayerNotFound {
                profile: name.clone(),
                path,
            });
        }
        let content = std::fs::read_to_string(&path)?;
        let layer = DotenvParser::for_file(&path).parse(&content)?;
        debug!(layer = %name, path = %path.display(), "loaded layer");
        files.insert(name.clone(), layer);
    }

    Ok(files)
}

/// Values for the declared secret keys, taken from the process environment.
pub fn injected_secrets(config: &AppConfig) -> HashMap<String, String> {
    config
        .secrets
        .keys
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|value| (key.clone(), value)))
        .collect()
}

/// Load the layers for `name` and resolve it.
///
/// Returns the layer files as well so callers can inspect what is committed.
pub fn resolve_profile(
    name: &str,
    config: &AppConfig,
    config_dir: &Path,
) -> Result<(ResolvedProfile, HashMap<String, LayerFile>)> {
    let resolver = ProfileResolver;
    let layers = resolver.layers(name, config)?;
    let files = load_layers(&layers, config, config_dir)?;
    let profile = resolver.resolve(name, config, &files, &injected_secrets(config))?;
    Ok((profile, files))
}

/// Display form of a value, hiding secrets.
pub fn display_value(config: &AppConfig, key: &str, value: &str) -> String {
    if config.is_secret(key) && !value.is_empty() {
        "********".to_string()
    } else {
        value.to_string()
    }
}

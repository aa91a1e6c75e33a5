use std::collections::HashMap;

use tracing::debug;

use crate::config::app_config::AppConfig;
use crate::core::errors::{DeployfigError, Result};
use crate::core::models::layer_file::LayerFile;
use crate::core::models::profile::ResolvedProfile;
use crate::core::models::resolved_config::{Origin, ResolvedConfig, ResolvedValue};

/// Resolves a profile by applying its layer over the base layer.
///
/// There is exactly one base profile. Every other profile either extends
/// it (two layers) or stands alone (one layer). Overrides replace values
/// wholesale; nothing is merged structurally.
pub struct ProfileResolver;

impl ProfileResolver {
    /// List the layers for `name`, base first.
    ///
    /// # Errors
    ///
    /// `ProfileNotFound` if `name` is not declared in `[profiles]`.
    pub fn layers(&self, name: &str, config: &AppConfig) -> Result<Vec<String>> {
        let entry = config
            .profiles
            .get(name)
            .ok_or_else(|| DeployfigError::ProfileNotFound {
                name: name.to_string(),
                available: config.available_profiles(),
            })?;

        let base = &config.deployfig.base_profile;
        let layers = if config.is_base(name) || entry.standalone {
            vec![name.to_string()]
        } else {
            vec![base.clone(), name.to_string()]
        };
        Ok(layers)
    }

    /// Resolve `name` from already-loaded layer files.
    ///
    /// `injected` holds secret values taken from the process environment.
    /// Only keys declared under `[secrets]` are applied, and they are
    /// applied last.
    ///
    /// # Errors
    ///
    /// - `ProfileNotFound` if `name` is not declared.
    /// - `LayerNotFound` if any layer is missing from `files`.
    pub fn resolve(
        &self,
        name: &str,
        config: &AppConfig,
        files: &HashMap<String, LayerFile>,
        injected: &HashMap<String, String>,
    ) -> Result<ResolvedProfile> {
        let layers = self.layers(name, config)?;
        let mut values: Vec<ResolvedValue> = Vec::new();

        for layer_name in &layers {
            let layer = files
                .get(layer_name)
                .ok_or_else(|| DeployfigError::LayerNotFound {
                    profile: layer_name.clone(),
                    path: config.layer_file_name(layer_name).into(),
                })?;
            let origin = Origin::Layer(layer_name.clone());
            for entry in layer.entries() {
                Self::apply(&mut values, &entry.key, &entry.value, &origin);
            }
            debug!(layer = %layer_name, keys = layer.keys().len(), "applied layer");
        }

        for key in &config.secrets.keys {
            if let Some(value) = injected.get(key) {
                Self::apply(&mut values, key, value, &Origin::Environment);
                debug!(%key, "injected secret from environment");
            }
        }

        Ok(ResolvedProfile {
            name: name.to_string(),
            config: ResolvedConfig::new(values),
            layers,
        })
    }

    /// Replace an existing key in place or append a new one.
    fn apply(values: &mut Vec<ResolvedValue>, key: &str, value: &str, origin: &Origin) {
        let resolved = ResolvedValue {
            key: key.to_string(),
            value: value.to_string(),
            origin: origin.clone(),
        };
        match values.iter_mut().find(|v| v.key == key) {
            Some(slot) => *slot = resolved,
            None => values.push(resolved),
        }
    }
}

use crate::core::errors::Result;
use crate::core::services::deploy_settings::DeploySettings;

/// Port for emitting a configuration artifact consumed by an external tool.
pub trait Renderer {
    /// Short name used in messages and the audit log (e.g. `"uwsgi"`).
    fn name(&self) -> &str;

    /// Suggested file name for the rendered artifact.
    fn default_file_name(&self, settings: &DeploySettings) -> String;

    /// Render the artifact text.
    fn render(&self, settings: &DeploySettings) -> Result<String>;
}

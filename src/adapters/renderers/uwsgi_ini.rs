use tracing::debug;

use crate::core::errors::Result;
use crate::core::services::deploy_settings::DeploySettings;
use crate::core::traits::renderer::Renderer;

/// Renders the uWSGI `.ini` file for a profile.
///
/// The file opens with a small variable namespace (`project`, `base`)
/// and reuses it through `%(...)` references where a value is derived
/// from the project directory.
pub struct UwsgiIniRenderer;

impl Renderer for UwsgiIniRenderer {
    fn name(&self) -> &str {
        "uwsgi"
    }

    fn default_file_name(&self, settings: &DeploySettings) -> String {
        format!("uwsgi-{}.ini", settings.profile)
    }

    fn render(&self, settings: &DeploySettings) -> Result<String> {
        let base = settings.project_dir.display().to_string();
        let socket = with_base_ref(&settings.socket.display().to_string(), &base);

        let out = format!(
            "# uWSGI configuration for {project} ({profile} profile)\n\
             [uwsgi]\n\
             # variables\n\
             project = {project}\n\
             base = {base}\n\
             \n\
             # configuration\n\
             master = true\n\
             processes = {processes}\n\
             virtualenv = {virtualenv}\n\
             pythonpath = %(base)\n\
             chdir = %(base)\n\
             env = DJANGO_SETTINGS_MODULE={settings_module}\n\
             module = {module}\n\
             socket = {socket}\n\
             chmod-socket = {chmod:o}\n",
            project = settings.project_name,
            profile = settings.profile,
            processes = settings.processes,
            virtualenv = settings.virtualenv.display(),
            settings_module = settings.settings_module,
            module = settings.wsgi_module,
            chmod = settings.chmod_socket,
        );

        debug!(profile = %settings.profile, "rendered uwsgi ini");
        Ok(out)
    }
}

/// Replace a leading `base` directory with the `%(base)` reference.
fn with_base_ref(path: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    match path.strip_prefix(base) {
        Some(rest) if rest.starts_with('/') => format!("%(base){rest}"),
        _ => path.to_string(),
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
            ("ALLOWED_HOSTS", "example.com"),
        ];
        pairs.extend_from_slice(extra);
        DeploySettings::from_resolved(&make_profile("production", &pairs)).unwrap()
    }

    #[test]
    fn renders_full_ini() {
        let ini = UwsgiIniRenderer.render(&settings(&[])).unwrap();

        let expected = "\
# uWSGI configuration for mysite (production profile)
[uwsgi]
# variables
project = mysite
base = /srv/mysite

# configuration
master = true
processes = 4
virtualenv = /srv/env/mysite
pythonpath = %(base)
chdir = %(base)
env = DJANGO_SETTINGS_MODULE=mysite.settings.production
module = mysite.wsgi:application
socket = %(base)/mysite.sock
chmod-socket = 666
";
        assert_eq!(ini, expected);
    }

    #[test]
    fn socket_outside_base_kept_literal() {
        let ini = UwsgiIniRenderer
            .render(&settings(&[
                ("UWSGI_SOCKET", "/tmp/mysite.sock"),
                ("UWSGI_CHMOD_SOCKET", "660"),
            ]))
            .unwrap();

        assert!(ini.contains("socket = /tmp/mysite.sock\n"));
        assert!(ini.contains("chmod-socket = 660\n"));
    }

    #[test]
    fn base_ref_requires_path_boundary() {
        assert_eq!(with_base_ref("/srv/mysite2/x.sock", "/srv/mysite"), "/srv/mysite2/x.sock");
        assert_eq!(with_base_ref("/srv/mysite/x.sock", "/srv/mysite/"), "%(base)/x.sock");
    }

    #[test]
    fn default_file_name_includes_profile() {
        assert_eq!(
            UwsgiIniRenderer.default_file_name(&settings(&[])),
            "uwsgi-production.ini"
        );
    }
}

pub mod deploy_settings;
pub mod diff_service;
pub mod lint_service;
pub mod profile_resolver;

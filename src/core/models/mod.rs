pub mod audit_entry;
pub mod diff_result;
pub mod layer_file;
pub mod lint;
pub mod profile;
pub mod resolved_config;

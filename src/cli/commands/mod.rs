pub mod audit_helpers;
pub mod check;
pub mod diff;
pub mod init;
pub mod layer_helpers;
pub mod log;
pub mod render;
pub mod resolve;
pub mod show;
pub mod status;

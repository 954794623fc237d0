//! CLI command implementations

pub mod app;
pub mod init;
pub mod version;

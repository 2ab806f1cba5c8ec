//! First-boot provisioning for Alpine Linux running under WSL.

pub mod cmd;
pub mod config;
pub mod pkg;
pub mod preflight;
pub mod provision;
pub mod rootless;
pub mod services;
pub mod user;

//! Shared modules used by the daemon and the CLI.

pub mod config;
pub mod debug;
pub mod matcher;

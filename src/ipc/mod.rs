//! IPC layer: message types and socket paths.

pub mod messages;

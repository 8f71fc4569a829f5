//! Bridge daemon: watch state machine, dispatch, and socket server.

pub mod dispatch;
pub mod events;
pub mod notifier;
pub mod server;
pub mod state;

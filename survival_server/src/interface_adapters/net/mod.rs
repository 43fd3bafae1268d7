// Network adapter modules: client sockets, outbound fan-out, and HTTP status.

pub mod client;
pub mod dispatch;
pub mod status;

pub use client::ws_handler;
pub use dispatch::{ConnectionRegistry, outbound_dispatcher};
pub use status::status_handler;

// Frameworks layer: runtime bootstrap, configuration and the HTTP server.

pub mod config;
pub mod server;

//! TCP rendering service: one request/response pair per connection.

/// Client side of the render protocol.
pub mod client;
/// Server configuration.
pub mod config;
/// Accept loop and per-connection session handling.
pub mod server;

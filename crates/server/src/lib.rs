//! HTTP and WebSocket front end for the CodeHeist engine.
//!
//! - `GET /ws` upgrades to the terminal protocol (see `codeheist-protocol`)
//! - `GET /health` reports liveness and the number of open sessions

pub mod connection;
pub mod http_api;

pub use connection::Connection;
pub use http_api::{router, AppState, SERVICE_NAME};

pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: &str = "8080";

/// Listen address: an explicit `--bind` wins, otherwise all interfaces on `$PORT`.
pub fn bind_address(explicit: Option<String>, port: Option<String>) -> String {
    if let Some(bind) = explicit.filter(|b| !b.trim().is_empty()) {
        return bind;
    }
    let port = port
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PORT.to_string());
    format!("0.0.0.0:{port}")
}

//! Mode routing
//!
//! - Server mode (HTTP server, the default)
//! - CLI mode (one-shot helper commands)

pub mod cli;
pub mod server;

pub use cli::{run_generate_config, run_issue_token};
pub use server::{AppState, configure_routes, run_server};

// Server module entry point
// Listener creation, the accept loop, connection serving and signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use tokio::sync::Notify;

use crate::config::{AppState, Config};
use crate::error::ServerError;
use crate::logger;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::start_signal_handler;

/// Bind, announce, and serve until SIGINT/SIGTERM.
///
/// Must be called from within a Tokio runtime.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let state = Arc::new(AppState::new(config)?);
    let addr = state.config.get_socket_addr()?;

    let listener = create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
    logger::log_server_start(&addr, &state);

    let shutdown = Arc::new(Notify::new());
    start_signal_handler(Arc::clone(&shutdown))?;

    start_server_loop(listener, state, shutdown).await
}

// Connection handling module
// Serves one accepted TCP connection on its own task

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::time::Instant;

use crate::config::AppState;
use crate::handler;
use crate::http::SecurityHeaders;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// Requests are answered by the static handler wrapped in
/// [`SecurityHeaders`], so no response can leave without the headers.
/// Only header reads are bounded (`read_timeout`); a keep-alive connection
/// with no new request for `keep_alive_timeout` is shut down gracefully,
/// letting a response still being written finish first. A failing
/// connection is logged and affects nothing else.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let idle_limit = Duration::from_secs(performance.keep_alive_timeout);
        let keep_alive = !idle_limit.is_zero();

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(keep_alive)
            .title_case_headers(true);
        if performance.read_timeout > 0 {
            builder.header_read_timeout(Duration::from_secs(performance.read_timeout));
        }

        let last_request = Arc::new(Mutex::new(Instant::now()));
        let seen = Arc::clone(&last_request);
        let service_state = Arc::clone(&state);
        let service = SecurityHeaders::new(service_fn(move |req| {
            *seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
            handler::handle_request(req, Arc::clone(&service_state), peer_addr)
        }));

        let conn = builder.serve_connection(io, service);
        tokio::pin!(conn);

        let mut closing = false;
        let result = loop {
            tokio::select! {
                result = conn.as_mut() => break result,
                () = idle_expired(&last_request, idle_limit), if keep_alive && !closing => {
                    logger::log_connection_idle(&peer_addr);
                    conn.as_mut().graceful_shutdown();
                    closing = true;
                }
            }
        };

        if let Err(err) = result {
            logger::log_connection_error(&err);
        }
    });
}

/// Resolves once `limit` has passed since the last request arrived
async fn idle_expired(last_request: &Mutex<Instant>, limit: Duration) {
    loop {
        let deadline = *last_request.lock().unwrap_or_else(PoisonError::into_inner) + limit;
        if Instant::now() >= deadline {
            return;
        }
        tokio::time::sleep_until(deadline).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_idle_expired_waits_for_quiet_period() {
        let started = Instant::now();
        let last_request = Mutex::new(Instant::now());
        idle_expired(&last_request, Duration::from_millis(200)).await;
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_idle_expired_restarts_after_activity() {
        let started = Instant::now();
        let last_request = Arc::new(Mutex::new(Instant::now()));

        let touch = Arc::clone(&last_request);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            *touch.lock().unwrap() = Instant::now();
        });

        idle_expired(&last_request, Duration::from_millis(200)).await;
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}

//! Development static file server.
//!
//! Serves a content root (`www/` by default) over plain HTTP/1.x and adds
//! the cross-origin isolation headers (`COOP`/`COEP`), `Referrer-Policy`,
//! `X-Content-Type-Options` and a `frame-ancestors` CSP to every response.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServerError;

//! Startup error type
//!
//! Anything that can stop the server before it starts accepting connections.
//! Per-request failures never reach this type; they become HTTP statuses.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid port '{0}': expected an integer between 0 and 65535")]
    InvalidPort(String),

    #[error("unexpected argument '{0}' (usage: www-server [PORT])")]
    UnexpectedArgument(String),

    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("content root '{}' is not accessible: {source}", .path.display())]
    ContentRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("content root '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

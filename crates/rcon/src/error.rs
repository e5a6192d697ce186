use std::io;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("addr is empty")]
    EmptyAddress,
    #[error("resolve addr {addr:?}: {source}")]
    Resolve { addr: String, source: io::Error },
    #[error("resolve addr {addr:?}: no addresses found")]
    NoAddress { addr: String },
    #[error("dial udp {addr}: {source}")]
    Dial { addr: SocketAddr, source: io::Error },
}

#[derive(Debug, Error)]
pub enum RconError {
    #[error("q3rcon: {0}")]
    Construction(#[from] ConstructionError),
    #[error("q3rcon: client is closed")]
    Closed,
    #[error("q3rcon: cmd is empty")]
    EmptyCommand,
    #[error("q3rcon: write: {0}")]
    Write(io::Error),
    #[error("q3rcon: timeout (no response)")]
    Timeout,
    #[error("q3rcon: read: {0}")]
    Read(io::Error),
    #[error("q3rcon: max packets reached ({limit})")]
    MaxPacketsExceeded { limit: usize, partial: String },
    #[error("q3rcon: cancelled before any response")]
    Cancelled,
}

impl RconError {
    /// Text that arrived before the error, if any survived it.
    pub fn partial_reply(&self) -> Option<&str> {
        match self {
            RconError::MaxPacketsExceeded { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

//! Client for the Quake 3 style out-of-band rcon protocol over UDP.
//!
//! A reply has no length or terminator on the wire, so [`RconClient::send`]
//! keeps reading datagrams until the server has been quiet for
//! [`ClientConfig::quiet_window`], bounded by [`ClientConfig::timeout`].

pub mod cancel;
pub mod client;
pub mod config;
pub mod diag;
pub mod error;
pub mod exchange;
pub mod net;
pub mod sanitize;

pub use cancel::CancelToken;
pub use client::RconClient;
pub use config::{ClientConfig, DEFAULT_QUIET_WINDOW, DEFAULT_TIMEOUT};
pub use diag::{DiagnosticSink, LogSink, StderrSink};
pub use error::{ConstructionError, RconError};
pub use exchange::{Completion, Reply};
pub use net::{DEFAULT_RECV_BUFFER_SIZE, NetworkStats, OOB_HEADER, RconEndpoint, build_frame};
pub use sanitize::clean;

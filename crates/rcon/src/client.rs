use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::{ConstructionError, RconError};
use crate::exchange::{Exchange, Reply};
use crate::net::{NetworkStats, RconEndpoint};

/// An rcon session bound to one server address.
///
/// `send` and `close` share one lock, so exchanges never overlap and a
/// `close` issued mid-exchange waits for it to finish. A closed client never
/// reopens.
pub struct RconClient {
    remote_addr: SocketAddr,
    password: String,
    config: ClientConfig,
    endpoint: Mutex<Option<RconEndpoint>>,
}

impl RconClient {
    /// `addr` is `host:port` of the game port; `password` is the server's
    /// `rcon_password` and is sent as given, even when empty.
    pub fn open(
        addr: &str,
        password: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, RconError> {
        let addr = addr.trim();
        if addr.is_empty() {
            return Err(ConstructionError::EmptyAddress.into());
        }

        let remote_addr = resolve(addr)?;
        let config = config.normalized();

        let endpoint = RconEndpoint::connect(remote_addr, config.read_buffer).map_err(|source| {
            ConstructionError::Dial {
                addr: remote_addr,
                source,
            }
        })?;

        config.trace(format_args!("q3rcon: connected to {}", remote_addr));

        Ok(Self {
            remote_addr,
            password: password.into(),
            config,
            endpoint: Mutex::new(Some(endpoint)),
        })
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.lock().as_ref().map(RconEndpoint::local_addr)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// Counters of the open socket; zeroed once the client is closed.
    pub fn stats(&self) -> NetworkStats {
        self.lock()
            .as_ref()
            .map(|endpoint| *endpoint.stats())
            .unwrap_or_default()
    }

    pub fn send(&self, command: &str) -> Result<Reply, RconError> {
        self.send_with_cancel(command, &CancelToken::new())
    }

    pub fn send_with_cancel(&self, command: &str, cancel: &CancelToken) -> Result<Reply, RconError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(RconError::EmptyCommand);
        }

        let mut guard = self.lock();
        let endpoint = guard.as_mut().ok_or(RconError::Closed)?;

        self.config.trace(format_args!("q3rcon: >> {:?}", command));

        Exchange::new(&self.password, command, &self.config).run(endpoint, cancel)
    }

    pub fn close(&self) -> Result<(), RconError> {
        if self.lock().take().is_some() {
            self.config
                .trace(format_args!("q3rcon: closed connection to {}", self.remote_addr));
        }
        Ok(())
    }

    // A panic mid-exchange leaves the socket usable, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Option<RconEndpoint>> {
        self.endpoint.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve(addr: &str) -> Result<SocketAddr, ConstructionError> {
    let addrs: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|source| ConstructionError::Resolve {
            addr: addr.to_string(),
            source,
        })?
        .collect();

    addrs
        .iter()
        .find(|candidate| candidate.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| ConstructionError::NoAddress {
            addr: addr.to_string(),
        })
}

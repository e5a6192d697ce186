use std::fmt;
use std::time::Instant;

use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::RconError;
use crate::net::{RconEndpoint, build_frame};
use crate::sanitize::clean;

const PREVIEW_CHARS: usize = 200;

/// Why the read loop stopped collecting datagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The server stayed silent for a full quiet window.
    Quiet,
    DeadlineReached,
    Cancelled,
    /// More than `limit` datagrams arrived; the reply may be truncated.
    PacketLimit { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub packets: usize,
    pub completion: Completion,
}

impl Reply {
    pub fn is_partial(&self) -> bool {
        matches!(self.completion, Completion::PacketLimit { .. })
    }

    /// Folds a packet-limit reply into `RconError::MaxPacketsExceeded`.
    pub fn into_result(self) -> Result<String, RconError> {
        match self.completion {
            Completion::PacketLimit { limit } => Err(RconError::MaxPacketsExceeded {
                limit,
                partial: self.text,
            }),
            _ => Ok(self.text),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub(crate) struct Exchange<'a> {
    config: &'a ClientConfig,
    frame: Vec<u8>,
    buffer: Vec<u8>,
    packets: usize,
}

impl<'a> Exchange<'a> {
    pub(crate) fn new(password: &str, command: &str, config: &'a ClientConfig) -> Self {
        Self {
            config,
            frame: build_frame(password, command),
            buffer: Vec::new(),
            packets: 0,
        }
    }

    pub(crate) fn run(
        mut self,
        endpoint: &mut RconEndpoint,
        cancel: &CancelToken,
    ) -> Result<Reply, RconError> {
        endpoint.send(&self.frame).map_err(RconError::Write)?;

        let overall_deadline = Instant::now() + self.config.timeout;

        loop {
            if cancel.is_cancelled() {
                return self.finish(Completion::Cancelled).ok_or(RconError::Cancelled);
            }

            let now = Instant::now();
            if now >= overall_deadline {
                return self
                    .finish(Completion::DeadlineReached)
                    .ok_or(RconError::Timeout);
            }

            // The first datagram gets the whole budget, later ones only the quiet window.
            let read_deadline = if self.buffer.is_empty() {
                overall_deadline
            } else {
                now + self.config.quiet_window
            };

            match endpoint.recv_until(read_deadline) {
                Ok(Some(datagram)) => {
                    self.buffer.extend_from_slice(datagram);
                    self.packets += 1;

                    self.config.trace(format_args!(
                        "q3rcon: << packet {} ({} bytes)",
                        self.packets,
                        datagram.len()
                    ));

                    if let Some(limit) = self.config.packet_limit() {
                        if self.packets > limit {
                            return Ok(self.reply(Completion::PacketLimit { limit }));
                        }
                    }
                }
                Ok(None) => return self.finish(Completion::Quiet).ok_or(RconError::Timeout),
                Err(e) => return Err(RconError::Read(e)),
            }
        }
    }

    fn finish(self, completion: Completion) -> Option<Reply> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.reply(completion))
        }
    }

    fn reply(self, completion: Completion) -> Reply {
        let text = clean(&self.buffer);
        self.config
            .trace(format_args!("q3rcon: << {:?}", preview(&text)));

        Reply {
            text,
            packets: self.packets,
            completion,
        }
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::diag::{DiagnosticSink, LogSink};
use crate::net::DEFAULT_RECV_BUFFER_SIZE;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1200);
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(140);

#[derive(Clone)]
pub struct ClientConfig {
    /// Total budget for one exchange, and the wait for the first datagram.
    pub timeout: Duration,
    /// Silence after the latest datagram that ends a reply.
    pub quiet_window: Duration,
    pub read_buffer: usize,
    /// `None` or `Some(0)` leaves the packet count unbounded.
    pub max_packets: Option<usize>,
    pub debug: bool,
    pub sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            quiet_window: DEFAULT_QUIET_WINDOW,
            read_buffer: DEFAULT_RECV_BUFFER_SIZE,
            max_packets: None,
            debug: false,
            sink: Some(Arc::new(LogSink)),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("timeout", &self.timeout)
            .field("quiet_window", &self.quiet_window)
            .field("read_buffer", &self.read_buffer)
            .field("max_packets", &self.max_packets)
            .field("debug", &self.debug)
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_quiet_window(mut self, quiet_window: Duration) -> Self {
        self.quiet_window = quiet_window;
        self
    }

    pub fn with_read_buffer(mut self, size: usize) -> Self {
        self.read_buffer = size;
        self
    }

    pub fn with_max_packets(mut self, max_packets: usize) -> Self {
        self.max_packets = (max_packets > 0).then_some(max_packets);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sink<S: DiagnosticSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn without_sink(mut self) -> Self {
        self.sink = None;
        self
    }

    /// Replaces zero durations and a zero buffer size with the defaults.
    pub fn normalized(mut self) -> Self {
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        if self.quiet_window.is_zero() {
            self.quiet_window = DEFAULT_QUIET_WINDOW;
        }
        if self.read_buffer == 0 {
            self.read_buffer = DEFAULT_RECV_BUFFER_SIZE;
        }
        self.max_packets = self.packet_limit();
        self
    }

    pub fn packet_limit(&self) -> Option<usize> {
        self.max_packets.filter(|&limit| limit > 0)
    }

    pub(crate) fn trace(&self, args: fmt::Arguments<'_>) {
        if !self.debug {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.log(&args.to_string());
        }
    }
}

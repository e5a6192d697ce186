use std::io::{self, Write};

/// Receives formatted diagnostic lines from a client with debug enabled.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, line: &str);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, line: &str) {
        self(line)
    }
}

/// Forwards lines to the `log` facade under the `q3rcon` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn log(&self, line: &str) {
        log::info!(target: "q3rcon", "{}", line);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn log(&self, line: &str) {
        let _ = writeln!(io::stderr().lock(), "{}", line);
    }
}

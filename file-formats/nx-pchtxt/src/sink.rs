//! Diagnostic sink receiving parse progress and warnings
//!
//! The parser writes one human-readable message per notable event; format
//! and destination are the caller's concern and never feed back into the
//! parsed result. Messages are prefixed `L<n>:` with a 1-indexed source
//! line number, except a few top-of-pass messages.

use std::io::Write;

/// Write-only, line-oriented sink for parse diagnostics
pub trait DiagnosticSink {
    /// Receive one diagnostic message, without a trailing newline
    fn line(&mut self, message: &str);
}

/// Discards every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn line(&mut self, _message: &str) {}
}

/// Writes one diagnostic per line to any [`Write`] destination
#[derive(Debug)]
pub struct WriteSink<W: Write> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    /// Create a sink writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for WriteSink<W> {
    fn line(&mut self, message: &str) {
        // diagnostics are advisory; a failing writer must not abort the parse
        let _ = writeln!(self.writer, "{message}");
    }
}

/// Forwards every diagnostic to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn line(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// Captures diagnostics for later inspection
impl DiagnosticSink for Vec<String> {
    fn line(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

//! Error types for Patch Text parsing

use std::io;
use thiserror::Error;

/// Result type alias for Patch Text operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Patch Text operations
///
/// Malformed input is not an `Error`: the parser reports it through the
/// [`DiagnosticSink`](crate::DiagnosticSink) and either skips the line or
/// stops early, returning everything parsed up to that point. Only a failure
/// of the underlying stream aborts the parse.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading or rewinding the input stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

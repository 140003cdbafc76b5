//! Parser for the Patch Text (pchtxt) format.
//!
//! Patch Text is a human-authored plaintext format describing binary
//! patches for NSO and NRO executable images. A document starts with a
//! small metadata header (`@title`, `@program`, `@url`), followed by one or
//! more patch collections, each scoped to the build ID of one target
//! binary via `@flag nsobid`/`@flag nrobid` (or the legacy `@nsobid` tag).
//! Patches are opened by `@enabled`/`@disabled` tags, named from the
//! preceding `//` comment line, or by `[bracketed]` cheat-script headers
//! storing raw text lines.
//!
//! Parsing is two-pass: a lenient meta scan over the document head, then a
//! full stateful scan building the collection structure. Both passes start
//! at the beginning of the stream, so the input must support rewinding.
//! Progress and warnings go to a caller-provided [`DiagnosticSink`];
//! malformed input is reported there and recovered from or, for the two
//! fatal cases (a patch opened before any build ID, a legacy build-ID tag
//! without a value), ends the scan early while keeping everything parsed
//! up to that point.
//!
//! # Examples
//!
//! ```
//! use std::io::Cursor;
//! use nx_pchtxt::{parse_pchtxt, NullSink};
//!
//! let text = "\
//! @title \"My Game\"
//!
//! @flag nsobid 1AB2C3D4E5F6
//! [Moon Jump]
//! 04 00 00 00
//!
//! ";
//! let output = parse_pchtxt(&mut Cursor::new(text), &mut NullSink)?;
//! assert_eq!(output.meta.title, "My Game");
//! assert_eq!(output.collections[0].patches[0].name, "Moon Jump");
//! # Ok::<(), nx_pchtxt::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod meta;
pub mod parser;
pub mod sink;
pub mod types;

mod line;
mod tags;

pub use error::{Error, Result};
pub use meta::parse_meta;
pub use parser::parse_pchtxt;
pub use sink::{DiagnosticSink, LogSink, NullSink, WriteSink};
pub use types::{
    Patch, PatchCollection, PatchContent, PatchTextMeta, PatchTextOutput, PatchType, TargetType,
};

//! The main parsing pass over a Patch Text document
//!
//! After the meta pass, the whole stream is re-scanned line by line. All
//! parser state lives in one exclusively owned [`ParseState`] record,
//! mutated by a handler per line kind; each handler reports whether the
//! scan continues or stops. Malformed input never panics and never aborts
//! with an `Err`: fatal problems log one `ERROR` diagnostic, stop the scan
//! and keep everything completed so far.

use std::io::{BufRead, Seek, SeekFrom};
use std::mem;

use crate::error::Result;
use crate::line::{Line, first_token, is_hex_token, read_line, split_name_author};
use crate::meta::parse_meta;
use crate::sink::DiagnosticSink;
use crate::tags::{
    ALT_DEBUG_INFO_FLAG, BIG_ENDIAN_FLAG, CHEAT_KEYWORD, DEBUG_INFO_FLAG, DISABLED_TAG,
    ENABLED_TAG, FLAG_TAG, HEAP_KEYWORD, HEAP_TAG, LITTLE_ENDIAN_FLAG, META_TAGS, NROBID_FLAG,
    NSOBID_FLAG, NSOBID_TAG, OFFSET_SHIFT_FLAG, STOP_TAG,
};
use crate::types::{Patch, PatchCollection, PatchContent, PatchTextOutput, PatchType, TargetType};

/// Outcome of handling one line
enum Step {
    Continue,
    Stop,
}

/// Parse `@flag offset_shift` values: decimal or `0x`-prefixed hex,
/// optionally negative
fn parse_offset_shift(value: &str) -> Option<i64> {
    let (negative, magnitude) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let parsed = match magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => magnitude.parse(),
    };
    parsed.ok().map(|shift| if negative { -shift } else { shift })
}

/// All state carried across lines of the main pass
struct ParseState {
    collections: Vec<PatchCollection>,
    collection: PatchCollection,
    patch: Patch,
    /// Content of the most recent full-line comment, the name/author
    /// source for the next `@enabled`/`@disabled` patch
    last_comment: String,
    /// Byte order for future content decoding; tracked but not yet consumed
    big_endian: bool,
    /// Offset shift for future content decoding; tracked but not yet consumed
    offset_shift: i64,
    accepting_body: bool,
    verbose: bool,
}

impl ParseState {
    fn new() -> Self {
        Self {
            collections: Vec::new(),
            collection: PatchCollection::default(),
            patch: Patch::default(),
            last_comment: String::new(),
            big_endian: false,
            offset_shift: 0,
            accepting_body: false,
            verbose: false,
        }
    }

    fn in_cheat_body(&self) -> bool {
        self.accepting_body && self.patch.patch_type == PatchType::CheatScript
    }

    /// Move the in-progress patch into the collection when complete,
    /// otherwise discard it
    fn flush_patch<S: DiagnosticSink + ?Sized>(&mut self, num: usize, sink: &mut S) {
        if self.patch.is_complete() {
            let label = match self.patch.patch_type {
                PatchType::CheatScript => "cheat script read",
                PatchType::Binary | PatchType::Heap => "patch read",
            };
            sink.line(&format!("L{num}: {label}: {}", self.patch.name));
            self.collection.patches.push(mem::take(&mut self.patch));
        } else {
            self.patch = Patch::default();
        }
    }

    /// Move the in-progress collection into the output when it has patches,
    /// otherwise discard it
    fn flush_collection<S: DiagnosticSink + ?Sized>(&mut self, num: usize, sink: &mut S) {
        if self.collection.patches.is_empty() {
            self.collection = PatchCollection::default();
        } else {
            if self.verbose {
                sink.line(&format!(
                    "L{num}: parsing completed for {}",
                    self.collection.build_id
                ));
            }
            self.collections.push(mem::take(&mut self.collection));
        }
    }

    fn handle_line<S: DiagnosticSink + ?Sized>(
        &mut self,
        num: usize,
        raw: &str,
        sink: &mut S,
    ) -> Step {
        match Line::classify(raw) {
            Line::Tag { stripped } => self.handle_tag(num, stripped, sink),
            Line::Echo => {
                sink.line(&format!("L{num}: {raw}"));
                Step::Continue
            }
            Line::CheatHeader { name } => self.handle_cheat_header(num, name, sink),
            Line::Comment { content } => {
                self.last_comment = content.to_string();
                Step::Continue
            }
            Line::Body { text } => self.handle_body(num, raw, text, sink),
        }
    }

    fn handle_tag<S: DiagnosticSink + ?Sized>(
        &mut self,
        num: usize,
        stripped: &str,
        sink: &mut S,
    ) -> Step {
        // any tag ends an open cheat-script body
        if self.in_cheat_body() {
            sink.line(&format!(
                "L{num}: WARNING: cheat script [{}] ended because parsing reached a tag",
                self.patch.name
            ));
            self.flush_patch(num, sink);
            self.accepting_body = false;
        }

        let folded = stripped.to_ascii_lowercase();
        let tag = first_token(&folded);
        let rest = stripped[tag.len()..].trim();

        match tag {
            STOP_TAG => {
                sink.line(&format!(
                    "L{num}: done parsing patches (reached tag {STOP_TAG})"
                ));
                Step::Stop
            }
            ENABLED_TAG | DISABLED_TAG => self.start_patch(num, tag == ENABLED_TAG, rest, sink),
            HEAP_TAG => {
                self.patch.patch_type = PatchType::Heap;
                Step::Continue
            }
            FLAG_TAG => self.handle_flag(num, rest, sink),
            _ if folded.starts_with(NSOBID_TAG) => {
                self.handle_legacy_build_id(num, stripped[NSOBID_TAG.len()..].trim(), sink)
            }
            _ if !META_TAGS.contains(&tag) => {
                sink.line(&format!("L{num}: WARNING ignored unrecognized tag: {tag}"));
                Step::Continue
            }
            _ => Step::Continue,
        }
    }

    /// `@enabled`/`@disabled`: close the previous patch and open a new one
    fn start_patch<S: DiagnosticSink + ?Sized>(
        &mut self,
        num: usize,
        enabled: bool,
        rest: &str,
        sink: &mut S,
    ) -> Step {
        if self.collection.build_id.is_empty() {
            sink.line(&format!("L{num}: ERROR: missing build id, abort parsing"));
            return Step::Stop;
        }

        self.flush_patch(num, sink);
        self.patch.enabled = enabled;

        // an optional kind keyword may follow the tag
        let rest_folded = rest.to_ascii_lowercase();
        match first_token(&rest_folded) {
            HEAP_KEYWORD => self.patch.patch_type = PatchType::Heap,
            CHEAT_KEYWORD => self.patch.patch_type = PatchType::CheatScript,
            _ => {}
        }

        // cheat scripts are named by their header, everything else by the
        // preceding comment line
        if self.patch.patch_type != PatchType::CheatScript {
            let (name, author) = split_name_author(&self.last_comment);
            self.patch.name = name;
            self.patch.author = author;
        }

        self.accepting_body = true;
        if self.verbose {
            sink.line(&format!("L{num}: parsing patch: {}", self.patch.name));
        }
        Step::Continue
    }

    fn handle_flag<S: DiagnosticSink + ?Sized>(
        &mut self,
        num: usize,
        rest: &str,
        sink: &mut S,
    ) -> Step {
        let folded = rest.to_ascii_lowercase();
        let flag = first_token(&folded);
        let value = rest[flag.len()..].trim();

        match flag {
            BIG_ENDIAN_FLAG | LITTLE_ENDIAN_FLAG => {
                self.big_endian = flag == BIG_ENDIAN_FLAG;
                if self.verbose {
                    let order = if self.big_endian { "big" } else { "little" };
                    sink.line(&format!("L{num}: byte order set to {order} endian"));
                }
            }
            NSOBID_FLAG | NROBID_FLAG => {
                self.flush_patch(num, sink);
                self.flush_collection(num, sink);

                self.collection.build_id = value.to_string();
                self.collection.target_type = if flag == NROBID_FLAG {
                    TargetType::Nro
                } else {
                    TargetType::Nso
                };
                self.accepting_body = false;

                if self.verbose {
                    sink.line(&format!(
                        "L{num}: parsing started for {}",
                        self.collection.build_id
                    ));
                }
            }
            OFFSET_SHIFT_FLAG => match parse_offset_shift(value) {
                Some(shift) => {
                    self.offset_shift = shift;
                    if self.verbose {
                        sink.line(&format!("L{num}: offset shift set to {}", self.offset_shift));
                    }
                }
                None => {
                    sink.line(&format!(
                        "L{num}: WARNING ignored invalid offset shift value: {value}"
                    ));
                }
            },
            DEBUG_INFO_FLAG | ALT_DEBUG_INFO_FLAG => {
                self.verbose = true;
                sink.line(&format!("L{num}: additional debug info enabled"));
            }
            _ => {
                sink.line(&format!(
                    "L{num}: WARNING ignored unrecognized flag type: {flag}"
                ));
            }
        }
        Step::Continue
    }

    /// Legacy one-collection `@nsobid` form; sets the build id in place
    /// without flushing prior state
    fn handle_legacy_build_id<S: DiagnosticSink + ?Sized>(
        &mut self,
        num: usize,
        value: &str,
        sink: &mut S,
    ) -> Step {
        if value.is_empty() {
            sink.line(&format!(
                "L{num}: ERROR: missing build id value, abort parsing"
            ));
            return Step::Stop;
        }

        self.collection.target_type = TargetType::Nso;
        self.collection.build_id = value.to_string();
        if self.verbose {
            sink.line(&format!(
                "L{num}: parsing started for {} (legacy style bid)",
                self.collection.build_id
            ));
        }
        Step::Continue
    }

    fn handle_cheat_header<S: DiagnosticSink + ?Sized>(
        &mut self,
        num: usize,
        name: &str,
        sink: &mut S,
    ) -> Step {
        if self.collection.build_id.is_empty() {
            sink.line(&format!("L{num}: ERROR: missing build id, abort parsing"));
            return Step::Stop;
        }

        self.flush_patch(num, sink);
        self.patch.name = name.to_string();
        self.patch.author = String::new();
        self.patch.enabled = true;
        self.patch.patch_type = PatchType::CheatScript;
        self.accepting_body = true;
        Step::Continue
    }

    fn handle_body<S: DiagnosticSink + ?Sized>(
        &mut self,
        num: usize,
        raw: &str,
        text: &str,
        sink: &mut S,
    ) -> Step {
        if !self.accepting_body {
            return Step::Continue;
        }

        match self.patch.patch_type {
            PatchType::CheatScript => {
                if raw.trim().is_empty() {
                    self.flush_patch(num, sink);
                    self.accepting_body = false;
                } else {
                    self.patch.contents.push(PatchContent {
                        offset: 0,
                        value: text.as_bytes().to_vec(),
                    });
                }
            }
            PatchType::Binary | PatchType::Heap => {
                if text.is_empty() {
                    return Step::Continue;
                }
                let offset_token = first_token(text);
                if !is_hex_token(offset_token) {
                    if self.verbose {
                        sink.line(&format!(
                            "L{num}: invalid offset, line skipped: {offset_token}"
                        ));
                    }
                    return Step::Continue;
                }
                // decoding the value bytes into PatchContent is not
                // implemented; the line is recognized and dropped
            }
        }
        Step::Continue
    }

    /// Final flush, run regardless of how the scan ended
    fn finish<S: DiagnosticSink + ?Sized>(
        mut self,
        num: usize,
        sink: &mut S,
    ) -> Vec<PatchCollection> {
        self.flush_patch(num, sink);
        self.flush_collection(num, sink);
        self.collections
    }
}

/// Parse a complete Patch Text document
///
/// Runs the meta pass, rewinds the stream to position zero, then scans the
/// whole document. The stream must be exclusively owned for the duration of
/// the parse. The only `Err` is an I/O failure of `reader`; malformed input
/// is reported through `sink` and yields a best-effort document.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use nx_pchtxt::{parse_pchtxt, NullSink, TargetType};
///
/// let text = "@flag nsobid A1B2C3\n[Infinite Health]\n04 00 00 00\n\n";
/// let output = parse_pchtxt(&mut Cursor::new(text), &mut NullSink).unwrap();
/// assert_eq!(output.collections.len(), 1);
/// assert_eq!(output.collections[0].build_id, "A1B2C3");
/// assert_eq!(output.collections[0].target_type, TargetType::Nso);
/// ```
pub fn parse_pchtxt<R, S>(reader: &mut R, sink: &mut S) -> Result<PatchTextOutput>
where
    R: BufRead + Seek,
    S: DiagnosticSink + ?Sized,
{
    reader.seek(SeekFrom::Start(0))?;
    let meta = parse_meta(reader, sink)?;
    reader.seek(SeekFrom::Start(0))?;

    let mut state = ParseState::new();
    let mut line_num = 1usize;
    loop {
        let Some(raw) = read_line(reader)? else {
            sink.line("done parsing patches");
            break;
        };
        if let Step::Stop = state.handle_line(line_num, &raw, sink) {
            break;
        }
        line_num += 1;
    }

    let collections = state.finish(line_num, sink);
    Ok(PatchTextOutput { meta, collections })
}

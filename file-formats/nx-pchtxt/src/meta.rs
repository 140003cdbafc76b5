//! Metadata pass over the head of a Patch Text document
//!
//! The meta block runs from the start of the stream to the first blank
//! line, the end of the stream, or an explicit `@stop`. It is scanned
//! leniently: unrecognized tags are ignored here because the main pass
//! re-validates the whole document.

use std::io::BufRead;

use crate::error::Result;
use crate::line::{first_token, read_line, strip_comment};
use crate::sink::DiagnosticSink;
use crate::tags::{PROGRAM_ID_TAG, STOP_TAG, TITLE_TAG, URL_TAG};
use crate::types::PatchTextMeta;

/// Strip one optional pair of surrounding double quotes
fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Extract the metadata header, reading from the current stream position
///
/// Recognized tags are `@title`, `@program` and `@url` (case-insensitive);
/// the last occurrence of a tag wins. `#` echo lines are forwarded to the
/// sink and their payload kept as a legacy title candidate, used when no
/// explicit `@title` is present.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use nx_pchtxt::{parse_meta, NullSink};
///
/// let text = "@title \"My Game\"\n@program 0100ABCD12345678\n\n@stop ignored\n";
/// let meta = parse_meta(&mut Cursor::new(text), &mut NullSink).unwrap();
/// assert_eq!(meta.title, "My Game");
/// assert_eq!(meta.program_id, "0100ABCD12345678");
/// ```
pub fn parse_meta<R, S>(reader: &mut R, sink: &mut S) -> Result<PatchTextMeta>
where
    R: BufRead + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let mut meta = PatchTextMeta::default();
    let mut legacy_title = String::new();

    let mut line_num = 1usize;
    loop {
        let Some(raw) = read_line(reader)? else {
            sink.line("meta parsing reached end of file");
            break;
        };

        // meta stops at the first blank line
        if raw.trim().is_empty() {
            sink.line(&format!("L{line_num}: done parsing meta"));
            break;
        }

        let stripped = strip_comment(&raw);

        if stripped.starts_with('@') {
            let folded = stripped.to_ascii_lowercase();
            let tag = first_token(&folded);
            if tag == STOP_TAG {
                sink.line("done parsing meta (reached tag @stop)");
                break;
            }

            let field = match tag {
                TITLE_TAG => Some(&mut meta.title),
                PROGRAM_ID_TAG => Some(&mut meta.program_id),
                URL_TAG => Some(&mut meta.url),
                _ => None,
            };
            if let Some(field) = field {
                let value = unquote(stripped[tag.len()..].trim());
                *field = value.to_string();
                sink.line(&format!("L{line_num}: meta: {tag}={value}"));
            }
        } else if let Some(rest) = stripped.strip_prefix('#') {
            sink.line(&format!("L{line_num}: {stripped}"));
            legacy_title = rest.trim().to_string();
        }

        line_num += 1;
    }

    if meta.title.is_empty() && !legacy_title.is_empty() {
        sink.line(&format!("using \"{legacy_title}\" as legacy style title"));
        meta.title = legacy_title;
    }

    Ok(meta)
}

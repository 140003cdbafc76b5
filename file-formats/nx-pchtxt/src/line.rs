//! Line utilities and comment splitting
//!
//! Stateless helpers shared by the meta pass and the main parsing pass.
//! Comment detection must respect quoted strings: a `/` inside a
//! `"`-delimited value (for example an URL) does not start a comment.

use std::io::{self, BufRead};

/// The maximal prefix of `s` containing no whitespace
pub(crate) fn first_token(s: &str) -> &str {
    s.find(char::is_whitespace).map_or(s, |pos| &s[..pos])
}

/// Index of the first `/` not inside a quoted string, or `s.len()`
///
/// Each `"` toggles an in-string flag, so `@url "http://..."` survives
/// comment stripping intact.
pub(crate) fn comment_position(s: &str) -> usize {
    let mut in_string = false;
    for (pos, ch) in s.char_indices() {
        if !in_string && ch == '/' {
            return pos;
        }
        if ch == '"' {
            in_string = !in_string;
        }
    }
    s.len()
}

/// The line with any trailing comment removed, trimmed
pub(crate) fn strip_comment(s: &str) -> &str {
    s[..comment_position(s)].trim()
}

/// Payload of a full-line or trailing comment
///
/// Starts at the first character after the comment marker that is neither
/// whitespace nor `/`, and runs to the end of the line, right-trimmed.
pub(crate) fn comment_content(s: &str) -> &str {
    let tail = &s[comment_position(s)..];
    let start = tail
        .char_indices()
        .find(|&(_, ch)| !ch.is_whitespace() && ch != '/')
        .map_or(tail.len(), |(pos, _)| pos);
    tail[start..].trim_end()
}

/// Whether `s` is a non-empty run of ASCII hex digits
pub(crate) fn is_hex_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Split a comment line into patch name and author
///
/// The text between the first `[` and the last `]` is the author; the text
/// before the bracket is the name. Without a bracket pair the whole comment
/// is the name and the author is empty.
pub(crate) fn split_name_author(comment: &str) -> (String, String) {
    match (comment.find('['), comment.rfind(']')) {
        (Some(open), Some(close)) if open < close => (
            comment[..open].trim().to_string(),
            comment[open + 1..close].trim().to_string(),
        ),
        _ => (comment.trim().to_string(), String::new()),
    }
}

/// One raw line classified by its first character
///
/// Classification happens once per line; the parser then matches on the
/// result instead of re-scanning the text in every branch.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// `@`-prefixed tag line; `stripped` is comment-stripped and trimmed
    Tag { stripped: &'a str },
    /// `#`-prefixed echo line, forwarded to the diagnostic sink verbatim
    Echo,
    /// `[`-prefixed cheat-script header; `name` sits between the brackets
    CheatHeader { name: &'a str },
    /// `/`-prefixed full-line comment carrying a name/author candidate
    Comment { content: &'a str },
    /// Anything else, including blank lines; `text` is comment-stripped
    Body { text: &'a str },
}

impl<'a> Line<'a> {
    pub(crate) fn classify(raw: &'a str) -> Self {
        match raw.chars().next() {
            Some('@') => Line::Tag {
                stripped: strip_comment(raw),
            },
            Some('#') => Line::Echo,
            Some('[') => {
                let stripped = strip_comment(raw);
                let inner = match stripped.rfind(']') {
                    Some(end) => &stripped[1..end],
                    None => &stripped[1..],
                };
                Line::CheatHeader {
                    name: inner.trim(),
                }
            }
            Some('/') => Line::Comment {
                content: comment_content(raw),
            },
            _ => Line::Body {
                text: strip_comment(raw),
            },
        }
    }
}

/// Read one newline-terminated line, without the terminator
///
/// Returns `None` at end of stream. The final line may lack a trailing
/// newline. Invalid UTF-8 is recovered lossily, matching how other text
/// payloads in the wild are handled.
pub(crate) fn read_line<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    let line = match String::from_utf8(buf) {
        Ok(line) => line,
        Err(err) => {
            log::warn!("patch text contains invalid UTF-8, using lossy conversion");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    Ok(Some(line))
}

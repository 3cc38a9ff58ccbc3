//! Applying an edit list to text, and projecting it to line/column positions.
//!
//! Every offset handled here is a character offset; byte positions are derived
//! during a single forward walk over the text.

use std::str::Chars;

use serde::Serialize;

use crate::matcher::Match;

/// Characters kept on each side of a span by [`context`] when no radius is given.
pub const DEFAULT_CONTEXT_RADIUS: usize = 20;

/// A resolved edit projected onto the text's line structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location<'a> {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    pub start: usize,
    pub end: usize,
    pub source: &'a str,
    pub target: &'a str,
}

/// Forward-only char → byte offset mapping.
struct ByteCursor<'t> {
    chars: Chars<'t>,
    char_pos: usize,
    byte_pos: usize,
}

impl<'t> ByteCursor<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            chars: text.chars(),
            char_pos: 0,
            byte_pos: 0,
        }
    }

    /// Byte offset of char `target`; clamps to the end of the text.
    fn seek(&mut self, target: usize) -> usize {
        debug_assert!(target >= self.char_pos, "edits must be sorted");
        while self.char_pos < target {
            match self.chars.next() {
                Some(c) => {
                    self.byte_pos += c.len_utf8();
                    self.char_pos += 1;
                }
                None => break,
            }
        }
        self.byte_pos
    }
}

/// Copies `text`, substituting each edit's target for its span.
///
/// `edits` must be sorted and non-overlapping, as produced by
/// [`resolve`](crate::resolver::resolve).
///
/// ```
/// use zhtw::matcher::Match;
/// use zhtw::renderer::render;
///
/// let edits = [Match::new(0, 2, "用户", "使用者")];
/// assert_eq!(render("用户名", &edits), "使用者名");
/// ```
pub fn render(text: &str, edits: &[Match<'_>]) -> String {
    if edits.is_empty() {
        return text.to_owned();
    }

    let extra: usize = edits.iter().map(|e| e.target.len()).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut cursor = ByteCursor::new(text);
    let mut copied = 0usize;

    for edit in edits {
        let start = cursor.seek(edit.start);
        let end = cursor.seek(edit.end);
        out.push_str(&text[copied..start]);
        out.push_str(edit.target);
        copied = end;
    }
    out.push_str(&text[copied..]);
    out
}

/// Line and column of every edit, from one walk over `text`.
///
/// Lines are split on `\n`; a `\r` before it stays part of the previous line.
pub fn locate<'a>(text: &str, edits: &[Match<'a>]) -> Vec<Location<'a>> {
    let mut locations = Vec::with_capacity(edits.len());
    let mut chars = text.chars();
    let mut pos = 0usize;
    let mut line = 1usize;
    let mut line_start = 0usize;

    for edit in edits {
        debug_assert!(edit.start >= pos, "edits must be sorted");
        while pos < edit.start {
            match chars.next() {
                Some('\n') => {
                    line += 1;
                    line_start = pos + 1;
                }
                Some(_) => {}
                None => break,
            }
            pos += 1;
        }
        locations.push(Location {
            line,
            column: edit.start - line_start + 1,
            start: edit.start,
            end: edit.end,
            source: edit.source,
            target: edit.target,
        });
    }
    locations
}

/// Byte offset of every char boundary in a text, end included.
///
/// Built once when many snippets are cut from the same text.
pub(crate) struct CharIndex<'t> {
    text: &'t str,
    bytes: Vec<usize>,
}

impl<'t> CharIndex<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        bytes.push(text.len());
        Self { text, bytes }
    }

    fn char_len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub(crate) fn context(&self, start: usize, end: usize, radius: usize) -> String {
        let len = self.char_len();
        let from = start.min(len).saturating_sub(radius);
        let to = end.saturating_add(radius).min(len);

        let mut snippet = String::new();
        if from > 0 {
            snippet.push_str("...");
        }
        snippet.extend(
            self.text[self.bytes[from]..self.bytes[to.max(from)]]
                .chars()
                .map(|c| if c == '\n' { ' ' } else { c }),
        );
        if to < len {
            snippet.push_str("...");
        }
        snippet
    }
}

/// One-line snippet of `text` around `start..end`, `radius` characters each side.
///
/// Cut ends are marked with `...`; newlines become spaces.
///
/// ```
/// use zhtw::renderer::context;
///
/// assert_eq!(context("第一行\n软件在這裡", 4, 6, 2), "...行 软件在這...");
/// assert_eq!(context("用户", 0, 2, 20), "用户");
/// ```
pub fn context(text: &str, start: usize, end: usize, radius: usize) -> String {
    CharIndex::new(text).context(start, end, radius)
}

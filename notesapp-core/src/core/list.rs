//! Line prefixes for bulleted, dashed and numbered lists.
//!
//! List formatting lives in the text itself: each list line starts with a
//! prefix (`"• "`, `"- "` or `"3. "`). Numbers are always derived from the
//! line's position in the whole text, so every pass renumbers from scratch.

use crate::core::span::check_range;
use crate::core::text::{char_len, line_ranges, slice_chars};
use crate::{FormatKind, FormatSet, FormattingSpan, Result, Splice};
use regex::Regex;
use std::sync::LazyLock;

static NUMBERED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\. ").expect("numbered prefix pattern is valid"));

const BULLET_PREFIX: &str = "• ";
const DASH_PREFIX: &str = "- ";

/// The list style applied to new lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Dashed,
    Numbered,
}

impl ListKind {
    /// Picks the list style from the active formats: bullets win over dashes,
    /// dashes over numbers.
    pub fn from_active(active: &FormatSet) -> Option<Self> {
        if active.contains(&FormatKind::BulletList) {
            Some(Self::Bullet)
        } else if active.contains(&FormatKind::DashedList) {
            Some(Self::Dashed)
        } else if active.contains(&FormatKind::NumberedList) {
            Some(Self::Numbered)
        } else {
            None
        }
    }

    /// Prefix for the line at zero-based `line_index`.
    pub fn prefix(self, line_index: usize) -> String {
        match self {
            Self::Bullet => BULLET_PREFIX.to_string(),
            Self::Dashed => DASH_PREFIX.to_string(),
            Self::Numbered => format!("{}. ", line_index + 1),
        }
    }
}

/// Char length of the list prefix `line` starts with, if any.
pub fn existing_prefix_len(line: &str) -> Option<usize> {
    if line.starts_with(BULLET_PREFIX) || line.starts_with(DASH_PREFIX) {
        return Some(2);
    }
    numbered_prefix_len(line)
}

fn numbered_prefix_len(line: &str) -> Option<usize> {
    NUMBERED_PREFIX.find(line).map(|m| char_len(m.as_str()))
}

/// Text, spans and caret after a list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEdit {
    pub text: String,
    pub spans: Vec<FormattingSpan>,
    pub cursor: usize,
}

struct Line<'a> {
    index: usize,
    start: usize,
    end: usize,
    content: &'a str,
}

fn lines(text: &str) -> Vec<Line<'_>> {
    line_ranges(text)
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| Line {
            index,
            start,
            end,
            content: slice_chars(text, start, end),
        })
        .collect()
}

fn cursor_line<'a>(lines: &'a [Line<'a>], cursor: usize) -> &'a Line<'a> {
    lines
        .iter()
        .find(|line| line.start <= cursor && cursor <= line.end)
        .unwrap_or(&lines[lines.len() - 1])
}

fn prefix_splice_for(line: &Line<'_>, desired: &str) -> Option<Splice> {
    match existing_prefix_len(line.content) {
        Some(len) if slice_chars(line.content, 0, len) == desired => None,
        Some(len) => Some(Splice::replace(line.start, line.start + len, desired)),
        None => Some(Splice::insert(line.start, desired)),
    }
}

/// Splice that gives the cursor's line the prefix of `kind`, or `None` if it
/// already has it.
pub fn prefix_line_splice(text: &str, cursor: usize, kind: ListKind) -> Option<Splice> {
    let lines = lines(text);
    let line = cursor_line(&lines, cursor);
    prefix_splice_for(line, &kind.prefix(line.index))
}

/// Splice that removes the list prefix of the cursor's line, or `None` if it
/// has none.
pub fn strip_line_prefix_splice(text: &str, cursor: usize) -> Option<Splice> {
    let lines = lines(text);
    let line = cursor_line(&lines, cursor);
    existing_prefix_len(line.content).map(|len| Splice::replace(line.start, line.start + len, ""))
}

/// Handles a newline key press at `cursor`.
///
/// Without an active list format this inserts a plain `"\n"`. With one, the
/// cursor's line is given its list prefix, the line is split at the cursor and
/// the new line starts with the next prefix. Numbered lines below are
/// renumbered from their new positions. Spans are re-offset so they keep
/// covering the same characters, and the returned cursor sits after the new
/// line's prefix.
///
/// # Errors
///
/// Returns [`crate::NotesError::InvalidSpanRange`] if `cursor` or a span does
/// not fit `text`.
///
/// # Examples
///
/// ```rust
/// use notesapp_core::{break_line, FormatKind, FormatSet};
///
/// let active: FormatSet = [FormatKind::BulletList].into_iter().collect();
/// let out = break_line("one\ntwo\nthree", &[], 7, &active).unwrap();
/// assert_eq!(out.text, "one\n• two\n• \nthree");
/// assert_eq!(out.cursor, 12);
/// ```
pub fn break_line(
    text: &str,
    spans: &[FormattingSpan],
    cursor: usize,
    active: &FormatSet,
) -> Result<ListEdit> {
    let len = char_len(text);
    check_range(cursor, cursor, len)?;

    let mut out_text = text.to_string();
    let mut out_spans = spans.to_vec();

    let Some(kind) = ListKind::from_active(active) else {
        Splice::insert(cursor, "\n").apply(&mut out_text, &mut out_spans)?;
        return Ok(ListEdit {
            text: out_text,
            spans: out_spans,
            cursor: cursor + 1,
        });
    };

    let lines = lines(text);
    let line = cursor_line(&lines, cursor);
    let current_prefix = prefix_splice_for(line, &kind.prefix(line.index));

    // Never split inside the line's own prefix.
    let existing_len = existing_prefix_len(line.content).unwrap_or(0);
    let split_at = cursor.max(line.start + existing_len);
    let next_prefix = kind.prefix(line.index + 1);

    let mut splices = Vec::new();
    if kind == ListKind::Numbered {
        for later in lines.iter().filter(|l| l.index > line.index) {
            if let Some(len) = numbered_prefix_len(later.content) {
                let renumbered = kind.prefix(later.index + 1);
                if slice_chars(later.content, 0, len) != renumbered {
                    splices.push(Splice::replace(later.start, later.start + len, renumbered));
                }
            }
        }
    }
    splices.push(Splice::insert(split_at, format!("\n{next_prefix}")));
    if let Some(splice) = &current_prefix {
        splices.push(splice.clone());
    }

    // Back to front, so every splice still sees its original offsets.
    splices.sort_by(|a, b| b.start.cmp(&a.start));
    for splice in &splices {
        splice.apply(&mut out_text, &mut out_spans)?;
    }

    let prefix_delta = current_prefix.as_ref().map_or(0, |s| {
        char_len(&s.insert) as isize - (s.end - s.start) as isize
    });
    let new_cursor = (split_at as isize + prefix_delta) as usize + 1 + char_len(&next_prefix);
    log::debug!("list line break at {cursor} ({kind:?}), cursor now {new_cursor}");

    Ok(ListEdit {
        text: out_text,
        spans: out_spans,
        cursor: new_cursor,
    })
}

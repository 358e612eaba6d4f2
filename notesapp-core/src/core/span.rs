//! Formatting spans and their adjustment when the text changes.
//!
//! A span is a `start..end` char range plus the set of formats it applies.
//! Spans may overlap freely; their order in the list is the order in which
//! they are applied when rendering, so every function here preserves it.
//!
//! Edits are described in old-text coordinates by [`TextEdit`]:
//!
//! - insertion of `k` chars at `p` shifts starts `>= p` and ends `> p` by `k`;
//!   a span that ends exactly at `p` does not grow;
//! - removal of `p..q` subtracts the removed width from endpoints at or after
//!   `q` and collapses endpoints inside the range onto `p`;
//! - replacement is a removal followed by an insertion at `p`.

use crate::core::text::{char_len, splice_chars};
use crate::{FormatKind, FormatSet, NotesError, Result};

/// A range of text carrying one or more formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingSpan {
    pub start: usize,
    pub end: usize,
    pub formats: FormatSet,
}

impl FormattingSpan {
    pub fn new(start: usize, end: usize, formats: impl IntoIterator<Item = FormatKind>) -> Self {
        Self {
            start,
            end,
            formats: formats.into_iter().collect(),
        }
    }

    pub fn single(start: usize, end: usize, kind: FormatKind) -> Self {
        Self::new(start, end, [kind])
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn has(&self, kind: FormatKind) -> bool {
        self.formats.contains(&kind)
    }

    /// Checks `start <= end <= text_len`.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::InvalidSpanRange`] when the range is malformed or
    /// reaches past the end of the text.
    pub fn validate(&self, text_len: usize) -> Result<()> {
        check_range(self.start, self.end, text_len)
    }
}

pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<()> {
    if start > end || end > len {
        return Err(NotesError::span_range(start, end, len));
    }
    Ok(())
}

/// One change to a text, in old-text char coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    /// `len` chars inserted before the char at `at`.
    Insert { at: usize, len: usize },
    /// Chars in `start..end` removed.
    Remove { start: usize, end: usize },
    /// Chars in `start..end` replaced by `inserted` new chars.
    Replace {
        start: usize,
        end: usize,
        inserted: usize,
    },
}

impl TextEdit {
    /// Infers the edit that turns `old` into `new`.
    ///
    /// `cursor` is the caret position in `new` after the edit; it decides where
    /// the change happened when the texts alone are ambiguous (typing `a` into
    /// `aa`). Returns `None` when the texts are equal.
    pub fn diff(old: &str, new: &str, cursor: usize) -> Option<TextEdit> {
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();
        let (old_len, new_len) = (old_chars.len(), new_chars.len());

        let common_prefix = old_chars
            .iter()
            .zip(&new_chars)
            .take_while(|(a, b)| a == b)
            .count();
        // The edited region ends at the cursor, so it cannot start later than
        // the cursor minus the net growth.
        let cap = cursor
            .min(new_len)
            .saturating_sub(new_len.saturating_sub(old_len));
        let prefix = common_prefix.min(cap);

        let max_suffix = old_len.min(new_len) - prefix;
        let suffix = old_chars
            .iter()
            .rev()
            .zip(new_chars.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let removed_end = old_len - suffix;
        let inserted = new_len - suffix - prefix;
        match (removed_end > prefix, inserted > 0) {
            (false, false) => None,
            (false, true) => Some(TextEdit::Insert {
                at: prefix,
                len: inserted,
            }),
            (true, false) => Some(TextEdit::Remove {
                start: prefix,
                end: removed_end,
            }),
            (true, true) => Some(TextEdit::Replace {
                start: prefix,
                end: removed_end,
                inserted,
            }),
        }
    }

    /// Length of the text after this edit is applied to a text of `old_len` chars.
    pub fn new_len(&self, old_len: usize) -> usize {
        match *self {
            TextEdit::Insert { len, .. } => old_len + len,
            TextEdit::Remove { start, end } => old_len - (end - start),
            TextEdit::Replace {
                start,
                end,
                inserted,
            } => old_len - (end - start) + inserted,
        }
    }

    /// Range of the inserted chars in new-text coordinates, if the edit inserts any.
    pub fn inserted_range(&self) -> Option<(usize, usize)> {
        match *self {
            TextEdit::Insert { at, len } if len > 0 => Some((at, at + len)),
            TextEdit::Replace {
                start, inserted, ..
            } if inserted > 0 => Some((start, start + inserted)),
            _ => None,
        }
    }

    /// Maps a caret offset through the edit. Carets at the insertion point move
    /// past the inserted text.
    pub fn map_offset(&self, offset: usize) -> usize {
        shift_start(offset, self)
    }

    fn validate(&self, old_len: usize) -> Result<()> {
        match *self {
            TextEdit::Insert { at, .. } => check_range(at, at, old_len),
            TextEdit::Remove { start, end } | TextEdit::Replace { start, end, .. } => {
                check_range(start, end, old_len)
            }
        }
    }
}

fn removed(offset: usize, start: usize, end: usize) -> usize {
    if offset <= start {
        offset
    } else if offset >= end {
        offset - (end - start)
    } else {
        start
    }
}

fn shift_start(offset: usize, edit: &TextEdit) -> usize {
    match *edit {
        TextEdit::Insert { at, len } => {
            if offset >= at {
                offset + len
            } else {
                offset
            }
        }
        TextEdit::Remove { start, end } => removed(offset, start, end),
        TextEdit::Replace {
            start,
            end,
            inserted,
        } => {
            let offset = removed(offset, start, end);
            if offset >= start {
                offset + inserted
            } else {
                offset
            }
        }
    }
}

fn shift_end(offset: usize, edit: &TextEdit) -> usize {
    match *edit {
        TextEdit::Insert { at, len } => {
            if offset > at {
                offset + len
            } else {
                offset
            }
        }
        TextEdit::Remove { start, end } => removed(offset, start, end),
        TextEdit::Replace {
            start,
            end,
            inserted,
        } => {
            let offset = removed(offset, start, end);
            if offset > start {
                offset + inserted
            } else {
                offset
            }
        }
    }
}

/// Produces the span list for the text after `edit`.
///
/// When the edit inserts text and `active` is non-empty, a span with the
/// active formats covering exactly the inserted chars is appended (merged into
/// the last span when that one is adjacent and identical).
///
/// # Errors
///
/// Returns [`NotesError::InvalidSpanRange`] if any span or the edit itself does
/// not fit a text of `old_len` chars.
///
/// # Examples
///
/// ```rust
/// use notesapp_core::{adjust_spans, FormatKind, FormatSet, FormattingSpan, TextEdit};
///
/// let spans = vec![FormattingSpan::single(0, 5, FormatKind::Bold)];
/// let edit = TextEdit::Insert { at: 5, len: 6 };
/// let adjusted = adjust_spans(&spans, 5, &edit, &FormatSet::new()).unwrap();
/// assert_eq!(adjusted, spans);
/// ```
pub fn adjust_spans(
    spans: &[FormattingSpan],
    old_len: usize,
    edit: &TextEdit,
    active: &FormatSet,
) -> Result<Vec<FormattingSpan>> {
    for span in spans {
        span.validate(old_len)?;
    }
    edit.validate(old_len)?;

    let new_len = edit.new_len(old_len);
    let mut adjusted: Vec<FormattingSpan> = spans
        .iter()
        .map(|span| FormattingSpan {
            start: shift_start(span.start, edit),
            end: shift_end(span.end, edit),
            formats: span.formats.clone(),
        })
        .collect();

    if let Some((start, end)) = edit.inserted_range() {
        if !active.is_empty() {
            push_coalescing(
                &mut adjusted,
                FormattingSpan {
                    start,
                    end,
                    formats: active.clone(),
                },
            );
        }
    }

    Ok(clip_spans(&adjusted, new_len))
}

/// Appends a span covering `start..end` with `formats`, leaving existing spans alone.
///
/// # Errors
///
/// Returns [`NotesError::InvalidSpanRange`] if the selection does not fit the text.
pub fn apply_to_selection(
    spans: &[FormattingSpan],
    text_len: usize,
    start: usize,
    end: usize,
    formats: &FormatSet,
) -> Result<Vec<FormattingSpan>> {
    check_range(start, end, text_len)?;
    let mut result = spans.to_vec();
    if start < end && !formats.is_empty() {
        push_coalescing(
            &mut result,
            FormattingSpan {
                start,
                end,
                formats: formats.clone(),
            },
        );
    }
    Ok(result)
}

/// Clamps every span to `0..=new_len` and drops the ones that become empty.
pub fn clip_spans(spans: &[FormattingSpan], new_len: usize) -> Vec<FormattingSpan> {
    spans
        .iter()
        .filter_map(|span| {
            let start = span.start.min(new_len);
            let end = span.end.min(new_len);
            (start < end && !span.formats.is_empty()).then(|| FormattingSpan {
                start,
                end,
                formats: span.formats.clone(),
            })
        })
        .collect()
}

// Only the last span may absorb the new one: it is applied last either way,
// so rendering does not change.
fn push_coalescing(spans: &mut Vec<FormattingSpan>, span: FormattingSpan) {
    if let Some(last) = spans.last_mut() {
        if last.end == span.start && last.formats == span.formats {
            last.end = span.end;
            return;
        }
    }
    spans.push(span);
}

/// A concrete replacement of `start..end` (char offsets) with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub start: usize,
    pub end: usize,
    pub insert: String,
}

impl Splice {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            insert: text.into(),
        }
    }

    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            insert: text.into(),
        }
    }

    /// The span-level view of this splice; `None` when it changes nothing.
    pub fn edit(&self) -> Option<TextEdit> {
        let inserted = char_len(&self.insert);
        match (self.start < self.end, inserted > 0) {
            (false, false) => None,
            (false, true) => Some(TextEdit::Insert {
                at: self.start,
                len: inserted,
            }),
            (true, false) => Some(TextEdit::Remove {
                start: self.start,
                end: self.end,
            }),
            (true, true) => Some(TextEdit::Replace {
                start: self.start,
                end: self.end,
                inserted,
            }),
        }
    }

    pub fn map_offset(&self, offset: usize) -> usize {
        self.edit().map_or(offset, |edit| edit.map_offset(offset))
    }

    /// Applies the splice to `text` and re-offsets `spans` to match.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::InvalidSpanRange`] if the splice or a span does not
    /// fit the text.
    pub fn apply(&self, text: &mut String, spans: &mut Vec<FormattingSpan>) -> Result<()> {
        let Some(edit) = self.edit() else {
            return Ok(());
        };
        let old_len = char_len(text);
        *spans = adjust_spans(spans, old_len, &edit, &FormatSet::new())?;
        splice_chars(text, self.start, self.end, &self.insert);
        Ok(())
    }
}

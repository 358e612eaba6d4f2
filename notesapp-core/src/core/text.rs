//! Char-offset helpers for `String`s.
//!
//! Every offset in the formatting engine counts Unicode scalar values, while
//! `String` is indexed by bytes. These helpers do the conversion.

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `char_idx`-th char, clamped to the end of the string.
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(s.len())
}

pub(crate) fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let from = byte_offset(s, start);
    let to = byte_offset(s, end);
    &s[from..to.max(from)]
}

/// Replaces the chars in `start..end` with `insert`.
pub(crate) fn splice_chars(s: &mut String, start: usize, end: usize, insert: &str) {
    let from = byte_offset(s, start);
    let to = byte_offset(s, end).max(from);
    s.replace_range(from..to, insert);
}

/// Char ranges `(start, end)` of each `\n`-separated line, terminators excluded.
pub(crate) fn line_ranges(s: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    for ch in s.chars() {
        if ch == '\n' {
            ranges.push((start, idx));
            start = idx + 1;
        }
        idx += 1;
    }
    ranges.push((start, idx));
    ranges
}

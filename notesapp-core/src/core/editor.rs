//! Editor state for a note description.
//!
//! [`EditorState`] owns the text, the caret/selection, the spans and the
//! toolbar's active formats for one open editor. The UI reports raw events
//! (the full new text plus selection after each keystroke, selection moves,
//! toolbar taps) and reads back [`StyledText`] and the active set.

use crate::core::list::{prefix_line_splice, strip_line_prefix_splice};
use crate::core::span::check_range;
use crate::core::text::char_len;
use crate::{
    adjust_spans, apply_styles, apply_to_selection, break_line, ActiveFormats, Document,
    FormatKind, FormattingSpan, ListKind, Result, Splice, StyledText, TextEdit,
};

/// A selection in char offsets. `start == end` is a plain caret.
///
/// `start` may be greater than `end` for a backwards selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// `(min, max)` of the two ends.
    pub fn ordered(&self) -> (usize, usize) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    fn map(self, splice: &Splice) -> Self {
        Self {
            start: splice.map_offset(self.start),
            end: splice.map_offset(self.end),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    text: String,
    selection: Selection,
    spans: Vec<FormattingSpan>,
    active: ActiveFormats,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a document with the caret at the end of the text.
    pub fn from_document(document: Document) -> Self {
        let end = document.len();
        Self {
            text: document.text,
            selection: Selection::caret(end),
            spans: document.spans,
            active: ActiveFormats::new(),
        }
    }

    /// Opens a persisted note description. Unreadable formatting is dropped.
    pub fn from_description(description: &str) -> Self {
        Self::from_document(Document::deserialize(description))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn spans(&self) -> &[FormattingSpan] {
        &self.spans
    }

    pub fn active_formats(&self) -> &ActiveFormats {
        &self.active
    }

    pub fn document(&self) -> Document {
        Document {
            text: self.text.clone(),
            spans: self.spans.clone(),
        }
    }

    /// Encodes the current text and spans for `Note::description`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::Json`] if encoding fails.
    pub fn to_description(&self) -> Result<String> {
        self.document().serialize()
    }

    /// Moves the caret or selection without changing the text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::InvalidSpanRange`] if the selection does not
    /// fit the text.
    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        let (start, end) = selection.ordered();
        check_range(start, end, char_len(&self.text))?;
        self.selection = selection;
        Ok(())
    }

    /// Applies a text-change event: `new_text` is the whole text after the
    /// change and `selection` the selection after it.
    ///
    /// A single newline typed while a list format is active continues the
    /// list; every other edit re-offsets the spans and formats inserted text
    /// with the active formats.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::InvalidSpanRange`] if the selection does not
    /// fit `new_text`.
    pub fn on_text_change(&mut self, new_text: &str, selection: Selection) -> Result<()> {
        let (sel_start, sel_end) = selection.ordered();
        check_range(sel_start, sel_end, char_len(new_text))?;

        let Some(edit) = TextEdit::diff(&self.text, new_text, selection.end) else {
            self.selection = selection;
            return Ok(());
        };

        let list_active = ListKind::from_active(self.active.as_set()).is_some();
        if let TextEdit::Insert { at, len: 1 } = edit {
            if list_active && new_text.chars().nth(at) == Some('\n') {
                let out = break_line(&self.text, &self.spans, at, self.active.as_set())?;
                self.text = out.text;
                self.spans = out.spans;
                self.selection = Selection::caret(out.cursor);
                return Ok(());
            }
        }

        self.spans = adjust_spans(
            &self.spans,
            char_len(&self.text),
            &edit,
            self.active.as_set(),
        )?;
        self.text = new_text.to_string();
        self.selection = selection;
        Ok(())
    }

    /// Toggles a toolbar format.
    ///
    /// Turning a format on over a non-empty selection formats the selection
    /// with the whole active set. Turning a list format on or off adds or
    /// removes the list prefix of the caret's line.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::InvalidSpanRange`] if the editor's own
    /// spans are inconsistent with its text.
    pub fn toggle_format(&mut self, kind: FormatKind) -> Result<()> {
        let now_active = self.active.toggle(kind);

        if now_active && !self.selection.is_collapsed() {
            let (start, end) = self.selection.ordered();
            self.spans = apply_to_selection(
                &self.spans,
                char_len(&self.text),
                start,
                end,
                self.active.as_set(),
            )?;
        }

        if kind.is_list() {
            let caret = self.selection.end;
            let splice = match ListKind::from_active(self.active.as_set()) {
                Some(list) => prefix_line_splice(&self.text, caret, list),
                None => strip_line_prefix_splice(&self.text, caret),
            };
            if let Some(splice) = splice {
                splice.apply(&mut self.text, &mut self.spans)?;
                self.selection = self.selection.map(&splice);
            }
        }
        Ok(())
    }

    /// Renders the text with its spans.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::InvalidSpanRange`] if the spans are
    /// inconsistent with the text.
    pub fn styled_text(&self) -> Result<StyledText> {
        apply_styles(&self.text, &self.spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FontWeight, FormatSet};
    use FormatKind::*;

    fn type_text(editor: &mut EditorState, typed: &str) {
        for ch in typed.chars() {
            let caret = editor.selection().end;
            let mut next: Vec<char> = editor.text().chars().collect();
            next.insert(caret, ch);
            let next: String = next.into_iter().collect();
            editor
                .on_text_change(&next, Selection::caret(caret + 1))
                .unwrap();
        }
    }

    #[test]
    fn test_bold_word_then_plain_append() {
        let mut editor = EditorState::new();
        type_text(&mut editor, "Hello");
        editor.set_selection(Selection::new(0, 5)).unwrap();
        editor.toggle_format(Bold).unwrap();
        editor.toggle_format(Bold).unwrap();
        editor.set_selection(Selection::caret(5)).unwrap();
        type_text(&mut editor, " world");

        assert_eq!(editor.text(), "Hello world");
        assert_eq!(editor.spans(), &[FormattingSpan::single(0, 5, Bold)]);
    }

    #[test]
    fn test_typing_with_bold_active() {
        let mut editor = EditorState::new();
        editor.toggle_format(Bold).unwrap();
        type_text(&mut editor, "Hi");
        assert_eq!(editor.spans(), &[FormattingSpan::single(0, 2, Bold)]);
        let styled = editor.styled_text().unwrap();
        assert_eq!(styled.runs.len(), 1);
        assert_eq!(styled.runs[0].style.font_weight, FontWeight::Bold);
    }

    #[test]
    fn test_backspace_shrinks_span() {
        let mut editor = EditorState::new();
        editor.toggle_format(Italic).unwrap();
        type_text(&mut editor, "abc");
        editor.on_text_change("ab", Selection::caret(2)).unwrap();
        assert_eq!(editor.spans(), &[FormattingSpan::single(0, 2, Italic)]);
        editor.on_text_change("", Selection::caret(0)).unwrap();
        assert!(editor.spans().is_empty());
    }

    #[test]
    fn test_selection_change_alone_keeps_spans() {
        let mut editor = EditorState::from_document(
            Document::new("abc", vec![FormattingSpan::single(0, 1, Bold)]).unwrap(),
        );
        editor.on_text_change("abc", Selection::new(1, 3)).unwrap();
        assert_eq!(editor.selection(), Selection::new(1, 3));
        assert_eq!(editor.spans().len(), 1);
    }

    #[test]
    fn test_toggle_over_selection_adds_span_with_active_set() {
        let mut editor = EditorState::from_description("some text");
        editor.toggle_format(Italic).unwrap();
        editor.set_selection(Selection::new(5, 9)).unwrap();
        editor.toggle_format(Bold).unwrap();
        assert_eq!(editor.spans(), &[FormattingSpan::new(5, 9, [Bold, Italic])]);
    }

    #[test]
    fn test_toggle_off_over_selection_adds_nothing() {
        let mut editor = EditorState::from_description("some text");
        editor.toggle_format(Bold).unwrap();
        editor.set_selection(Selection::new(9, 5)).unwrap();
        editor.toggle_format(Bold).unwrap();
        assert!(editor.spans().is_empty());
    }

    #[test]
    fn test_newline_in_bullet_list_continues_list() {
        let mut editor = EditorState::from_description("one\ntwo\nthree");
        editor.set_selection(Selection::caret(7)).unwrap();
        editor.toggle_format(BulletList).unwrap();
        assert_eq!(editor.text(), "one\n• two\nthree");
        assert_eq!(editor.selection(), Selection::caret(9));

        editor
            .on_text_change("one\n• two\n\nthree", Selection::caret(10))
            .unwrap();
        assert_eq!(editor.text(), "one\n• two\n• \nthree");
        assert_eq!(editor.selection(), Selection::caret(12));

        type_text(&mut editor, "four");
        assert_eq!(editor.text(), "one\n• two\n• four\nthree");
    }

    #[test]
    fn test_toggle_list_off_strips_prefix() {
        let mut editor = EditorState::from_description("item");
        editor.toggle_format(NumberedList).unwrap();
        assert_eq!(editor.text(), "1. item");
        assert_eq!(editor.selection(), Selection::caret(7));
        editor.toggle_format(NumberedList).unwrap();
        assert_eq!(editor.text(), "item");
        assert_eq!(editor.selection(), Selection::caret(4));
    }

    #[test]
    fn test_newline_without_list_is_plain_edit() {
        let mut editor = EditorState::from_description("ab");
        editor.set_selection(Selection::caret(1)).unwrap();
        editor.on_text_change("a\nb", Selection::caret(2)).unwrap();
        assert_eq!(editor.text(), "a\nb");
    }

    #[test]
    fn test_invalid_selection_is_rejected() {
        let mut editor = EditorState::from_description("abc");
        assert!(editor.set_selection(Selection::new(1, 4)).is_err());
        assert!(editor.on_text_change("ab", Selection::caret(3)).is_err());
        assert_eq!(editor.text(), "abc");
    }

    #[test]
    fn test_description_round_trip() {
        let mut editor = EditorState::new();
        editor.toggle_format(Heading).unwrap();
        type_text(&mut editor, "Title");
        editor.toggle_format(Heading).unwrap();
        type_text(&mut editor, " body");

        let reopened = EditorState::from_description(&editor.to_description().unwrap());
        assert_eq!(reopened.text(), "Title body");
        assert_eq!(reopened.spans(), &[FormattingSpan::single(0, 5, Heading)]);
        assert_eq!(reopened.selection(), Selection::caret(10));
        assert_eq!(reopened.active_formats().as_set(), &FormatSet::new());
    }
}

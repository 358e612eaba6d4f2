//! Core library for a note-taking application with password-protected notes and
//! lightweight rich-text descriptions.
//!
//! The rich-text engine keeps a note description as plain text plus a list of
//! [`FormattingSpan`]s. [`EditorState`] drives it from raw text-change and
//! toolbar events; [`Document`] moves it in and out of persistence.
//! Notes themselves are stored through a [`NoteStore`], and the two screen
//! controllers ([`NotesController`], [`NoteDetailController`]) apply user
//! intents and report back through an [`EventSink`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    controller::{
        NoteAction, NoteDetailController, NoteDetailIntent, NoteDraft, NoteListIntent,
        NotesController, NotesViewState,
    },
    document::{canonical_tag, DecodedDocument, Document, DropReason, DroppedSpan},
    editor::{EditorState, Selection},
    error::{NotesError, Result},
    events::{event_channel, AppEvent, ChannelEventSink, EventSink, SnackbarMessage},
    format::{ActiveFormats, FormatKind, FormatSet},
    list::{break_line, existing_prefix_len, ListEdit, ListKind},
    note::{hash_password, verify_password_hash, Note},
    repository::{NoteRepository, NoteStore},
    settings::{
        default_database_path, load_settings, load_settings_from, save_settings, save_settings_to,
        settings_file_path, AppSettings,
    },
    span::{adjust_spans, apply_to_selection, clip_spans, FormattingSpan, Splice, TextEdit},
    storage::Storage,
    style::{
        apply_styles, Color, FontSize, FontWeight, ResolvedStyle, StyledRun, StyledText,
        TextDecoration, VisualStyle,
    },
};

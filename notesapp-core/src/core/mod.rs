//! Internal domain modules for the notes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod controller;
pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod format;
pub mod list;
pub mod note;
pub mod repository;
pub mod settings;
pub mod span;
pub mod storage;
pub mod style;
pub(crate) mod text;

#[doc(inline)]
pub use controller::{
    NoteAction, NoteDetailController, NoteDetailIntent, NoteDraft, NoteListIntent,
    NotesController, NotesViewState,
};
#[doc(inline)]
pub use document::{canonical_tag, DecodedDocument, Document, DropReason, DroppedSpan};
#[doc(inline)]
pub use editor::{EditorState, Selection};
#[doc(inline)]
pub use error::{NotesError, Result};
#[doc(inline)]
pub use events::{event_channel, AppEvent, ChannelEventSink, EventSink, SnackbarMessage};
#[doc(inline)]
pub use format::{ActiveFormats, FormatKind, FormatSet};
#[doc(inline)]
pub use list::{break_line, existing_prefix_len, ListEdit, ListKind};
#[doc(inline)]
pub use note::{hash_password, verify_password_hash, Note};
#[doc(inline)]
pub use repository::{NoteRepository, NoteStore};
#[doc(inline)]
pub use settings::{
    default_database_path, load_settings, load_settings_from, save_settings, save_settings_to,
    settings_file_path, AppSettings,
};
#[doc(inline)]
pub use span::{adjust_spans, apply_to_selection, clip_spans, FormattingSpan, Splice, TextEdit};
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use style::{
    apply_styles, Color, FontSize, FontWeight, ResolvedStyle, StyledRun, StyledText,
    TextDecoration, VisualStyle,
};

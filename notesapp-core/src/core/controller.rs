//! Screen controllers for the note list and the note detail editor.
//!
//! Both controllers are plain state machines: the host feeds them intents
//! together with a [`NoteStore`], reads their state back, and receives
//! one-shot [`AppEvent`]s through the [`EventSink`] it injected.

use crate::{
    hash_password, verify_password_hash, AppEvent, EditorState, EventSink, FormatKind, Note,
    NoteStore, NotesError, Result, Selection, SnackbarMessage,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteListIntent {
    LoadNotes,
    DeleteNote(String),
    AddNoteClicked,
    OpenNoteClicked(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesViewState {
    pub is_loading: bool,
    pub notes: Vec<Note>,
    pub error_message: Option<String>,
}

/// Drives the note list screen.
pub struct NotesController<E: EventSink> {
    state: NotesViewState,
    events: E,
}

impl<E: EventSink> NotesController<E> {
    pub fn new(events: E) -> Self {
        Self {
            state: NotesViewState::default(),
            events,
        }
    }

    pub fn state(&self) -> &NotesViewState {
        &self.state
    }

    /// Applies `intent`. Store failures are logged and surfaced through
    /// [`NotesViewState::error_message`] rather than returned.
    pub fn handle_intent(&mut self, store: &mut dyn NoteStore, intent: NoteListIntent) {
        match intent {
            NoteListIntent::LoadNotes => self.load(store),
            NoteListIntent::DeleteNote(note_id) => match store.delete_note(&note_id) {
                Ok(()) => {
                    self.load(store);
                    self.events.emit(AppEvent::ShowSnackbar {
                        message: SnackbarMessage::NoteDeleted,
                    });
                }
                Err(e) => self.fail(e),
            },
            NoteListIntent::AddNoteClicked => {
                self.events.emit(AppEvent::NavigateToDetail { note_id: None })
            }
            NoteListIntent::OpenNoteClicked(note_id) => {
                self.events.emit(AppEvent::NavigateToDetail {
                    note_id: Some(note_id),
                })
            }
        }
    }

    fn load(&mut self, store: &dyn NoteStore) {
        self.state.is_loading = true;
        match store.list_notes() {
            Ok(notes) => {
                self.state.notes = notes;
                self.state.error_message = None;
            }
            Err(e) => self.fail(e),
        }
        self.state.is_loading = false;
    }

    fn fail(&mut self, error: NotesError) {
        log::error!("note list operation failed: {error}");
        self.state.error_message = Some(error.user_message());
        self.state.is_loading = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteDetailIntent {
    UpdateTitle(String),
    /// The description's full text and selection after a keystroke.
    EditDescription { text: String, selection: Selection },
    SelectDescription(Selection),
    ToggleFormat(FormatKind),
    LockNote { password: String },
    UnlockNote { password: String },
    AddOrSaveNote,
    DismissPasswordSheet,
}

/// Outcome of the last lock/unlock attempt, shown by the password sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum NoteAction {
    #[default]
    Idle,
    NoteLocked,
    NoteUnlocked { note_id: Option<String> },
    PasswordValidationError,
}

/// The non-description fields of the note being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    /// `None` until the note has been saved once.
    pub note_id: Option<String>,
    pub title: String,
    pub locked: bool,
    pub password_hash: Option<String>,
    pub created_at: i64,
}

/// Drives the note detail screen.
pub struct NoteDetailController<E: EventSink> {
    draft: NoteDraft,
    editor: EditorState,
    action: NoteAction,
    events: E,
}

impl<E: EventSink> NoteDetailController<E> {
    /// Starts editing a new, empty note.
    pub fn new_note(events: E) -> Self {
        Self {
            draft: NoteDraft {
                note_id: None,
                title: String::new(),
                locked: false,
                password_hash: None,
                created_at: Utc::now().timestamp(),
            },
            editor: EditorState::new(),
            action: NoteAction::Idle,
            events,
        }
    }

    /// Loads an existing note for editing.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::NoteNotFound`] if `note_id` is not stored.
    pub fn open(store: &dyn NoteStore, note_id: &str, events: E) -> Result<Self> {
        let note = store.get_note(note_id)?;
        Ok(Self {
            editor: EditorState::from_document(note.document()),
            draft: NoteDraft {
                note_id: Some(note.id),
                title: note.title,
                locked: note.is_encrypted,
                password_hash: note.password_hash,
                created_at: note.created_at,
            },
            action: NoteAction::Idle,
            events,
        })
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn action(&self) -> &NoteAction {
        &self.action
    }

    /// Applies `intent`.
    ///
    /// # Errors
    ///
    /// Editing intents fail with [`NotesError::InvalidSpanRange`] on a
    /// selection that does not fit the text. Saving fails with
    /// [`NotesError::ValidationFailed`] for an empty note, or with any store
    /// error.
    pub fn handle_intent(
        &mut self,
        store: &mut dyn NoteStore,
        intent: NoteDetailIntent,
    ) -> Result<()> {
        match intent {
            NoteDetailIntent::UpdateTitle(title) => self.draft.title = title,
            NoteDetailIntent::EditDescription { text, selection } => {
                self.editor.on_text_change(&text, selection)?
            }
            NoteDetailIntent::SelectDescription(selection) => self.editor.set_selection(selection)?,
            NoteDetailIntent::ToggleFormat(kind) => self.editor.toggle_format(kind)?,
            NoteDetailIntent::LockNote { password } => self.lock(&password),
            NoteDetailIntent::UnlockNote { password } => self.unlock(&password),
            NoteDetailIntent::AddOrSaveNote => self.save(store)?,
            NoteDetailIntent::DismissPasswordSheet => self.action = NoteAction::Idle,
        }
        Ok(())
    }

    fn lock(&mut self, password: &str) {
        if self.draft.locked {
            return;
        }
        if password.is_empty() {
            self.action = NoteAction::PasswordValidationError;
            return;
        }
        self.draft.locked = true;
        self.draft.password_hash = Some(hash_password(password));
        self.action = NoteAction::NoteLocked;
    }

    fn unlock(&mut self, password: &str) {
        if !self.draft.locked {
            return;
        }
        let hash = self.draft.password_hash.as_deref();
        match verify_password_hash(hash, self.draft.locked, password) {
            Ok(()) => {
                self.draft.locked = false;
                self.draft.password_hash = None;
                self.action = NoteAction::NoteUnlocked {
                    note_id: self.draft.note_id.clone(),
                };
            }
            Err(e) => {
                log::debug!("unlock of note {:?} refused: {e}", self.draft.note_id);
                self.action = NoteAction::PasswordValidationError;
            }
        }
    }

    fn save(&mut self, store: &mut dyn NoteStore) -> Result<()> {
        if self.draft.title.trim().is_empty() && self.editor.text().trim().is_empty() {
            return Err(NotesError::ValidationFailed(
                "A note needs a title or a description".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let mut note = Note {
            id: String::new(),
            title: self.draft.title.clone(),
            description: self.editor.to_description()?,
            is_encrypted: self.draft.locked,
            password_hash: self.draft.password_hash.clone(),
            created_at: self.draft.created_at,
            modified_at: now,
        };

        let message = match &self.draft.note_id {
            Some(id) => {
                note.id = id.clone();
                store.update_note(&note)?;
                SnackbarMessage::NoteUpdated
            }
            None => {
                note.id = Uuid::new_v4().to_string();
                store.insert_note(&note)?;
                self.draft.note_id = Some(note.id.clone());
                SnackbarMessage::NoteAdded
            }
        };

        self.events.emit(AppEvent::ShowSnackbar { message });
        self.events.emit(AppEvent::ExitScreen);
        Ok(())
    }
}

//! Note persistence behind the [`NoteStore`] seam.

use crate::{AppSettings, Note, NotesError, Result, Storage};
use rusqlite::{params, OptionalExtension};
use std::fs;
use std::path::Path;

/// CRUD access to stored notes.
///
/// Controllers take `&mut dyn NoteStore` so a host can swap the SQLite
/// repository for another backend.
pub trait NoteStore {
    /// Stores `note`, replacing any existing note with the same id.
    fn insert_note(&mut self, note: &Note) -> Result<()>;

    /// Overwrites an existing note.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::NoteNotFound`] if no note has `note.id`.
    fn update_note(&mut self, note: &Note) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`NotesError::NoteNotFound`] if no note has `note_id`.
    fn delete_note(&mut self, note_id: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`NotesError::NoteNotFound`] if no note has `note_id`.
    fn get_note(&self, note_id: &str) -> Result<Note>;

    /// All notes, most recently modified first.
    fn list_notes(&self) -> Result<Vec<Note>>;
}

/// SQLite-backed [`NoteStore`].
pub struct NoteRepository {
    storage: Storage,
}

const NOTE_COLUMNS: &str =
    "id, title, description, is_encrypted, password_hash, created_at, modified_at";

impl NoteRepository {
    /// Creates a new database at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::create(&path)?;
        log::info!("created notes database at {}", path.as_ref().display());
        Ok(Self { storage })
    }

    /// Opens an existing database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            storage: Storage::open(path)?,
        })
    }

    /// Opens the database named in `settings`, creating it and its parent
    /// directories when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Io`] if the directory cannot be created, or any
    /// error from [`Storage::open`].
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        let path = Path::new(&settings.database_path);
        if path.exists() {
            return Self::open(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::create(path)
    }
}

impl NoteStore for NoteRepository {
    fn insert_note(&mut self, note: &Note) -> Result<()> {
        self.storage.connection().execute(
            &format!(
                "INSERT OR REPLACE INTO notes ({NOTE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            params![
                note.id,
                note.title,
                note.description,
                note.is_encrypted,
                note.password_hash,
                note.created_at,
                note.modified_at,
            ],
        )?;
        log::info!("saved note {}", note.id);
        Ok(())
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        let changes = self.storage.connection().execute(
            "UPDATE notes
             SET title = ?2, description = ?3, is_encrypted = ?4, password_hash = ?5,
                 created_at = ?6, modified_at = ?7
             WHERE id = ?1",
            params![
                note.id,
                note.title,
                note.description,
                note.is_encrypted,
                note.password_hash,
                note.created_at,
                note.modified_at,
            ],
        )?;
        if changes == 0 {
            return Err(NotesError::NoteNotFound(note.id.clone()));
        }
        log::info!("updated note {}", note.id);
        Ok(())
    }

    fn delete_note(&mut self, note_id: &str) -> Result<()> {
        let changes = self
            .storage
            .connection()
            .execute("DELETE FROM notes WHERE id = ?1", [note_id])?;
        if changes == 0 {
            return Err(NotesError::NoteNotFound(note_id.to_string()));
        }
        log::info!("deleted note {note_id}");
        Ok(())
    }

    fn get_note(&self, note_id: &str) -> Result<Note> {
        self.storage
            .connection()
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                [note_id],
                map_note_row,
            )
            .optional()?
            .ok_or_else(|| NotesError::NoteNotFound(note_id.to_string()))
    }

    fn list_notes(&self) -> Result<Vec<Note>> {
        let mut stmt = self.storage.connection().prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY modified_at DESC, created_at DESC"
        ))?;
        let notes = stmt
            .query_map([], map_note_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }
}

fn map_note_row(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        is_encrypted: row.get(3)?,
        password_hash: row.get(4)?,
        created_at: row.get(5)?,
        modified_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    fn note(id: &str, modified_at: i64) -> Note {
        Note {
            id: id.to_string(),
            title: format!("Note {id}"),
            description: String::new(),
            is_encrypted: false,
            password_hash: None,
            created_at: 100,
            modified_at,
        }
    }

    #[test]
    fn test_insert_and_get_note() {
        let temp = NamedTempFile::new().unwrap();
        let mut repo = NoteRepository::create(temp.path()).unwrap();
        let mut stored = note("a", 100);
        stored.is_encrypted = true;
        stored.password_hash = Some("abc".to_string());
        repo.insert_note(&stored).unwrap();

        assert_eq!(repo.get_note("a").unwrap(), stored);
    }

    #[test]
    fn test_insert_replaces_on_conflict() {
        let temp = NamedTempFile::new().unwrap();
        let mut repo = NoteRepository::create(temp.path()).unwrap();
        repo.insert_note(&note("a", 100)).unwrap();
        let mut changed = note("a", 200);
        changed.title = "Changed".to_string();
        repo.insert_note(&changed).unwrap();

        assert_eq!(repo.list_notes().unwrap(), vec![changed]);
    }

    #[test]
    fn test_list_notes_newest_first() {
        let temp = NamedTempFile::new().unwrap();
        let mut repo = NoteRepository::create(temp.path()).unwrap();
        repo.insert_note(&note("old", 100)).unwrap();
        repo.insert_note(&note("new", 300)).unwrap();
        repo.insert_note(&note("mid", 200)).unwrap();

        let ids: Vec<String> = repo.list_notes().unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_update_note() {
        let temp = NamedTempFile::new().unwrap();
        let mut repo = NoteRepository::create(temp.path()).unwrap();
        repo.insert_note(&note("a", 100)).unwrap();

        let mut changed = note("a", 150);
        changed.description = "body".to_string();
        repo.update_note(&changed).unwrap();
        assert_eq!(repo.get_note("a").unwrap().description, "body");
    }

    #[test]
    fn test_missing_note_is_not_found() {
        let temp = NamedTempFile::new().unwrap();
        let mut repo = NoteRepository::create(temp.path()).unwrap();

        assert!(matches!(
            repo.get_note("nope"),
            Err(NotesError::NoteNotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            repo.update_note(&note("nope", 1)),
            Err(NotesError::NoteNotFound(_))
        ));
        assert!(matches!(
            repo.delete_note("nope"),
            Err(NotesError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_delete_note() {
        let temp = NamedTempFile::new().unwrap();
        let mut repo = NoteRepository::create(temp.path()).unwrap();
        repo.insert_note(&note("a", 100)).unwrap();
        repo.delete_note("a").unwrap();
        assert!(repo.list_notes().unwrap().is_empty());
    }

    #[test]
    fn test_from_settings_creates_missing_database() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("notes.db");
        let settings = AppSettings {
            database_path: db_path.to_string_lossy().to_string(),
        };

        let mut repo = NoteRepository::from_settings(&settings).unwrap();
        repo.insert_note(&note("a", 1)).unwrap();
        assert!(db_path.exists());

        let reopened = NoteRepository::from_settings(&settings).unwrap();
        assert_eq!(reopened.list_notes().unwrap().len(), 1);
    }
}

use crate::{NotesError, Result};
use rusqlite::Connection;
use std::path::Path;

/// Owns the SQLite connection holding the notes table.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens an existing database, upgrading older layouts in place.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::InvalidDatabase`] if the file has no `notes`
    /// table, or [`NotesError::Database`] if it is not SQLite at all.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'notes'",
            [],
            |row| row.get(0),
        )?;

        if table_count != 1 {
            return Err(NotesError::InvalidDatabase(
                "Not a valid notes database".to_string(),
            ));
        }

        // Databases written before note locking have no lock columns.
        for (column, definition) in [
            ("is_encrypted", "INTEGER NOT NULL DEFAULT 0"),
            ("password_hash", "TEXT"),
        ] {
            if !column_exists(&conn, column)? {
                log::info!("migrating notes table: adding column {column}");
                conn.execute(
                    &format!("ALTER TABLE notes ADD COLUMN {column} {definition}"),
                    [],
                )?;
            }
        }

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn column_exists(conn: &Connection, column: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info('notes') WHERE name = ?1",
        [column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn table_names(storage: &Storage) -> Vec<String> {
        storage
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_create_storage() {
        let temp = NamedTempFile::new().unwrap();
        let storage = Storage::create(temp.path()).unwrap();
        assert!(table_names(&storage).contains(&"notes".to_string()));
    }

    #[test]
    fn test_open_existing_storage() {
        let temp = NamedTempFile::new().unwrap();
        Storage::create(temp.path()).unwrap();

        let storage = Storage::open(temp.path()).unwrap();
        assert!(table_names(&storage).contains(&"notes".to_string()));
    }

    #[test]
    fn test_open_invalid_database() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "not a database").unwrap();

        let result = Storage::open(temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_open_database_without_notes_table() {
        let temp = NamedTempFile::new().unwrap();
        {
            let conn = Connection::open(temp.path()).unwrap();
            conn.execute("CREATE TABLE other (id INTEGER PRIMARY KEY)", [])
                .unwrap();
        }

        let result = Storage::open(temp.path());
        assert!(matches!(result, Err(NotesError::InvalidDatabase(_))));
    }

    #[test]
    fn test_migration_adds_lock_columns() {
        let temp = NamedTempFile::new().unwrap();

        // Layout from before note locking existed.
        {
            let conn = Connection::open(temp.path()).unwrap();
            conn.execute(
                "CREATE TABLE notes (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    modified_at INTEGER NOT NULL
                )",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO notes (id, title, description, created_at, modified_at)
                 VALUES ('a', 'Old', '', 1, 1)",
                [],
            )
            .unwrap();
        }

        let storage = Storage::open(temp.path()).unwrap();
        assert!(column_exists(storage.connection(), "is_encrypted").unwrap());
        assert!(column_exists(storage.connection(), "password_hash").unwrap());

        let encrypted: i64 = storage
            .connection()
            .query_row("SELECT is_encrypted FROM notes WHERE id = 'a'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(encrypted, 0);
    }
}

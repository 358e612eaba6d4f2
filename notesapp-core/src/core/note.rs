use crate::{Document, NotesError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A persisted note.
///
/// `description` holds the serialized [`Document`]; `password_hash` is the
/// hex SHA-256 digest of the note's password while it is locked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_encrypted: bool,
    pub password_hash: Option<String>,
    pub created_at: i64,
    pub modified_at: i64,
}

/// Hex-encoded SHA-256 digest of `password`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Checks `password` against a stored hash.
///
/// # Errors
///
/// Returns [`NotesError::WrongPassword`] when `locked` is set and the password
/// does not match `hash` (or there is no hash). Unlocked notes accept any
/// password.
pub fn verify_password_hash(hash: Option<&str>, locked: bool, password: &str) -> Result<()> {
    if !locked {
        return Ok(());
    }
    match hash {
        Some(hash) if hash == hash_password(password) => Ok(()),
        _ => Err(NotesError::WrongPassword),
    }
}

impl Note {
    /// Decodes the description into text and spans.
    pub fn document(&self) -> Document {
        Document::deserialize(&self.description)
    }

    /// Plain text of the description, without formatting.
    pub fn preview_text(&self) -> String {
        self.document().text
    }

    /// Checks `password` against the stored hash.
    ///
    /// # Errors
    ///
    /// See [`verify_password_hash`].
    pub fn verify_password(&self, password: &str) -> Result<()> {
        verify_password_hash(self.password_hash.as_deref(), self.is_encrypted, password)
    }

    /// Creation date as `"Jan 5, 2025"` (UTC).
    pub fn created_date_label(&self) -> String {
        format_timestamp(self.created_at, "%b %-d, %Y")
    }

    /// Creation time as `"3:07 PM"` (UTC).
    pub fn created_time_label(&self) -> String {
        format_timestamp(self.created_at, "%-I:%M %p")
    }
}

fn format_timestamp(secs: i64, pattern: &str) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> Note {
        Note {
            id: "test-id".to_string(),
            title: "Test Note".to_string(),
            description: String::new(),
            is_encrypted: false,
            password_hash: None,
            created_at: 1_736_089_620,
            modified_at: 1_736_089_620,
        }
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_password() {
        let mut locked = note();
        locked.is_encrypted = true;
        locked.password_hash = Some(hash_password("secret"));
        assert!(locked.verify_password("secret").is_ok());
        assert!(matches!(
            locked.verify_password("guess"),
            Err(NotesError::WrongPassword)
        ));
        assert!(note().verify_password("anything").is_ok());
    }

    #[test]
    fn test_locked_without_hash_rejects_every_password() {
        assert!(matches!(
            verify_password_hash(None, true, ""),
            Err(NotesError::WrongPassword)
        ));
        assert!(verify_password_hash(None, false, "").is_ok());
    }

    #[test]
    fn test_date_and_time_labels() {
        // 2025-01-05 15:07:00 UTC
        let n = note();
        assert_eq!(n.created_date_label(), "Jan 5, 2025");
        assert_eq!(n.created_time_label(), "3:07 PM");
    }

    #[test]
    fn test_preview_text_strips_formatting() {
        let mut n = note();
        n.description =
            r#"{"version":2,"text":"Hello","spans":[{"start":0,"end":5,"formats":["Bold"]}]}"#
                .to_string();
        assert_eq!(n.preview_text(), "Hello");
        assert_eq!(n.document().spans.len(), 1);
    }
}

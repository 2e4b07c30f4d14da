use crate::{PocketnotesError, Result};
use serde::{Deserialize, Serialize};

/// ID carried by a note that has not been written to the store yet.
pub const NEW_NOTE_ID: i64 = -1;

/// A short text note.
///
/// `created_at` and `modified_at` are Unix seconds stamped by the store; a
/// draft carries zeros until its first insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_bookmarked: bool,
    pub created_at: i64,
    pub modified_at: i64,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            id: NEW_NOTE_ID,
            title: String::new(),
            description: None,
            is_bookmarked: false,
            created_at: 0,
            modified_at: 0,
        }
    }
}

impl Note {
    /// Creates an unsaved draft with the given title and description.
    pub fn draft(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            ..Self::default()
        }
    }

    /// True once the store has assigned this note an ID.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Rejects notes whose title is empty or whitespace only.
    ///
    /// # Errors
    ///
    /// Returns [`PocketnotesError::Validation`] with the message shown to the user.
    pub fn validate_for_save(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PocketnotesError::Validation(
                "Title can't be empty".to_string(),
            ));
        }
        Ok(())
    }
}

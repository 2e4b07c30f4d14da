//! The note store contract shared by every controller.
//!
//! Controllers only ever talk to an `Arc<dyn NoteStore>`; the SQLite
//! implementation lives in [`crate::SqliteNoteStore`]. Every successful
//! mutation bumps a revision counter so list views can re-query without
//! polling.

use crate::{Note, Result};
use async_trait::async_trait;
use tokio::sync::watch;

/// Durable owner of note records.
///
/// Reads return the store's current snapshot. Writes are serialized by the
/// implementation; the last writer for a given id wins.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes, in insertion (id) order.
    async fn get_all(&self) -> Result<Vec<Note>>;

    /// The note with `id`, or `None` if it does not exist.
    async fn get_by_id(&self, id: i64) -> Result<Option<Note>>;

    /// Notes whose title matches the SQL `LIKE` expression `pattern`.
    ///
    /// Build `pattern` with [`contains_pattern`]; matching is case-insensitive
    /// for ASCII, as SQLite's `LIKE` is.
    async fn search(&self, pattern: &str) -> Result<Vec<Note>>;

    /// Inserts or replaces `note`.
    ///
    /// A note without an id gets a fresh one and fresh timestamps. A note
    /// that already carries an id is written verbatim, which is how a deleted
    /// note is restored with its original identity.
    async fn insert(&self, note: &Note) -> Result<Note>;

    /// Overwrites an existing note and refreshes `modified_at`.
    async fn update(&self, note: &Note) -> Result<Note>;

    /// Removes `note` immediately.
    async fn delete(&self, note: &Note) -> Result<()>;

    /// Revision counter that changes after every successful write.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Escape character used by [`contains_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Wraps `text` as a "contains" `LIKE` expression, escaping `%`, `_` and the
/// escape character itself so user input is matched literally.
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

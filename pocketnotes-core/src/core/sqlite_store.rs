//! [`NoteStore`] backed by a single SQLite connection.

use crate::{AppSettings, Note, NoteStore, PocketnotesError, Result, Storage};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use tokio::sync::{watch, Mutex};

const NOTE_COLUMNS: &str = "id, title, description, is_bookmarked, created_at, modified_at";

/// SQLite-backed note store.
///
/// The connection sits behind a `tokio::sync::Mutex`, so concurrent writes
/// from different controllers are applied one at a time.
pub struct SqliteNoteStore {
    storage: Mutex<Storage>,
    revision: watch::Sender<u64>,
}

impl SqliteNoteStore {
    pub fn new(storage: Storage) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            storage: Mutex::new(storage),
            revision,
        }
    }

    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PocketnotesError::InvalidDatabase`] if the file exists but is
    /// not a notes database, or [`PocketnotesError::Database`] for any SQLite
    /// failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Storage::open_or_create(path)?))
    }

    /// Opens the database named in `settings`, creating its directory first.
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        let path = Path::new(&settings.database_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::info!("opening notes database at {}", path.display());
        Self::open(path)
    }

    /// An empty store that lives only as long as the process.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Storage::open_in_memory()?))
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn get_all(&self) -> Result<Vec<Note>> {
        let storage = self.storage.lock().await;
        let mut stmt = storage
            .connection()
            .prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id"))?;
        let notes = stmt
            .query_map([], map_note_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>> {
        let storage = self.storage.lock().await;
        fetch_note(storage.connection(), id)
    }

    async fn search(&self, pattern: &str) -> Result<Vec<Note>> {
        log::debug!("searching notes with pattern {pattern:?}");
        let storage = self.storage.lock().await;
        let mut stmt = storage.connection().prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE title LIKE ?1 ESCAPE '\\' ORDER BY id"
        ))?;
        let notes = stmt
            .query_map([pattern], map_note_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    async fn insert(&self, note: &Note) -> Result<Note> {
        let mut storage = self.storage.lock().await;
        let tx = storage.connection_mut().transaction()?;

        let id = if note.is_persisted() {
            tx.execute(
                "INSERT OR REPLACE INTO notes (id, title, description, is_bookmarked, created_at, modified_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    note.id,
                    note.title,
                    note.description,
                    note.is_bookmarked,
                    note.created_at,
                    note.modified_at,
                ],
            )?;
            note.id
        } else {
            let now = chrono::Utc::now().timestamp();
            tx.execute(
                "INSERT INTO notes (title, description, is_bookmarked, created_at, modified_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                rusqlite::params![note.title, note.description, note.is_bookmarked, now],
            )?;
            tx.last_insert_rowid()
        };

        let stored = fetch_note(&tx, id)?.ok_or(PocketnotesError::NoteNotFound(id))?;
        tx.commit()?;
        drop(storage);

        self.bump_revision();
        Ok(stored)
    }

    async fn update(&self, note: &Note) -> Result<Note> {
        let now = chrono::Utc::now().timestamp();
        let mut storage = self.storage.lock().await;
        let tx = storage.connection_mut().transaction()?;

        tx.execute(
            "UPDATE notes SET title = ?1, description = ?2, is_bookmarked = ?3, modified_at = ?4
             WHERE id = ?5",
            rusqlite::params![note.title, note.description, note.is_bookmarked, now, note.id],
        )?;

        // An UPDATE on a missing row succeeds but touches nothing.
        if tx.changes() == 0 {
            return Err(PocketnotesError::NoteNotFound(note.id));
        }

        let stored = fetch_note(&tx, note.id)?.ok_or(PocketnotesError::NoteNotFound(note.id))?;
        tx.commit()?;
        drop(storage);

        self.bump_revision();
        Ok(stored)
    }

    async fn delete(&self, note: &Note) -> Result<()> {
        let storage = self.storage.lock().await;
        let removed = storage
            .connection()
            .execute("DELETE FROM notes WHERE id = ?1", [note.id])?;
        drop(storage);

        if removed == 0 {
            return Err(PocketnotesError::NoteNotFound(note.id));
        }
        self.bump_revision();
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

fn fetch_note(conn: &Connection, id: i64) -> Result<Option<Note>> {
    let note = conn
        .query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
            [id],
            map_note_row,
        )
        .optional()?;
    Ok(note)
}

fn map_note_row(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        is_bookmarked: row.get::<_, i64>(3)? != 0,
        created_at: row.get(4)?,
        modified_at: row.get(5)?,
    })
}

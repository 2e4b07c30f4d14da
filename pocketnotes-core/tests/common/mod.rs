//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use pocketnotes_core::{Note, NoteStore, PocketnotesError, Result, SqliteNoteStore};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{oneshot, watch};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory SQLite store that counts calls, can hold individual search
/// answers until the test releases them, and can be told to fail reads.
pub struct ScriptedStore {
    inner: SqliteNoteStore,
    searches: AtomicUsize,
    writes: AtomicUsize,
    held: AtomicUsize,
    failing_reads: AtomicBool,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteNoteStore::in_memory().unwrap(),
            searches: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            held: AtomicUsize::new(0),
            failing_reads: AtomicBool::new(false),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// The next search for `pattern` reads the store right away but holds
    /// its answer until the returned sender fires.
    pub fn hold_search(&self, pattern: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(pattern.to_string(), rx);
        tx
    }

    pub fn search_calls(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Searches that have read the store and are waiting to be released.
    pub fn held_searches(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    /// While set, `get_all`, `get_by_id` and `search` return an I/O error.
    pub fn fail_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<()> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(PocketnotesError::Io(io::Error::new(
                io::ErrorKind::Other,
                "disk I/O error",
            )));
        }
        Ok(())
    }

    pub async fn seed(&self, title: &str, description: Option<&str>, bookmarked: bool) -> Note {
        let mut draft = Note::draft(title, description.map(str::to_string));
        draft.is_bookmarked = bookmarked;
        self.inner.insert(&draft).await.unwrap()
    }
}

#[async_trait]
impl NoteStore for ScriptedStore {
    async fn get_all(&self) -> Result<Vec<Note>> {
        self.check_read()?;
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>> {
        self.check_read()?;
        self.inner.get_by_id(id).await
    }

    async fn search(&self, pattern: &str) -> Result<Vec<Note>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        let answer = self.inner.search(pattern).await;
        let gate = self.gates.lock().unwrap().remove(pattern);
        if let Some(gate) = gate {
            self.held.fetch_add(1, Ordering::SeqCst);
            let _ = gate.await;
            self.held.fetch_sub(1, Ordering::SeqCst);
        }
        answer
    }

    async fn insert(&self, note: &Note) -> Result<Note> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(note).await
    }

    async fn update(&self, note: &Note) -> Result<Note> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(note).await
    }

    async fn delete(&self, note: &Note) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(note).await
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.subscribe()
    }
}

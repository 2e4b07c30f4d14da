//! Delete-then-offer-undo.
//!
//! A delete is applied to the store immediately. The controller keeps a full
//! copy of the removed note until its deadline passes; undoing before then
//! re-inserts that copy with its original id, bookmark flag and timestamps.
//! After the deadline nothing is left to do: the store already reflects the
//! deletion, so expiry only settles the outcome and hides the snackbar.

use crate::{Note, NoteStore, PocketnotesError, Result, ScreenContext, UiEffect};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long the "Undo" affordance stays available after a delete.
pub const UNDO_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// Inside the undo window.
    Pending,
    /// The note was put back.
    Restored,
    /// The window elapsed; the deletion stands.
    Finalized,
}

/// A deleted note that can still be restored.
#[derive(Debug, Clone)]
pub struct PendingDeletion {
    pub note: Note,
    pub deadline: Instant,
    outcome: watch::Receiver<DeletionOutcome>,
}

impl PendingDeletion {
    pub fn outcome(&self) -> DeletionOutcome {
        *self.outcome.borrow()
    }

    /// Waits until the deletion is either restored or finalized.
    pub async fn settled(&mut self) -> DeletionOutcome {
        match self
            .outcome
            .wait_for(|o| *o != DeletionOutcome::Pending)
            .await
        {
            Ok(outcome) => *outcome,
            // The controller went away mid-window; the store still has the delete.
            Err(_) => DeletionOutcome::Finalized,
        }
    }
}

struct Entry {
    note: Note,
    deadline: Instant,
    outcome: watch::Sender<DeletionOutcome>,
    timer: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<i64, Entry>>>;

pub struct UndoDeleteController {
    store: Arc<dyn NoteStore>,
    ctx: ScreenContext,
    window: Duration,
    pending: PendingMap,
}

impl UndoDeleteController {
    pub fn new(store: Arc<dyn NoteStore>, ctx: ScreenContext) -> Self {
        Self::with_window(store, ctx, UNDO_WINDOW)
    }

    pub fn with_window(store: Arc<dyn NoteStore>, ctx: ScreenContext, window: Duration) -> Self {
        Self {
            store,
            ctx,
            window,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Deletes `note` from the store and opens its undo window.
    ///
    /// The stored record, not the caller's copy, is what gets stashed, so a
    /// bookmark toggled elsewhere since `note` was read is not lost.
    ///
    /// # Errors
    ///
    /// Returns [`PocketnotesError::NoteNotFound`] if the note is already gone,
    /// or any store error; a toast is shown in both cases.
    pub async fn delete(&self, note: &Note) -> Result<PendingDeletion> {
        self.delete_by_id(note.id).await
    }

    /// Same as [`delete`](Self::delete), for callers that only hold an id
    /// (a note card).
    pub async fn delete_by_id(&self, note_id: i64) -> Result<PendingDeletion> {
        let stored = match self.remove_from_store(note_id).await {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("failed to delete note {note_id}: {e}");
                self.ctx.toast(e.user_message());
                return Err(e);
            }
        };
        log::info!("deleted note {} ({:?})", stored.id, stored.title);

        let deadline = Instant::now() + self.window;
        let (outcome_tx, outcome_rx) = watch::channel(DeletionOutcome::Pending);
        self.arm(stored.clone(), deadline, outcome_tx);
        self.ctx.emit(UiEffect::UndoOffered {
            note_id: stored.id,
            title: stored.title.clone(),
        });

        Ok(PendingDeletion {
            note: stored,
            deadline,
            outcome: outcome_rx,
        })
    }

    async fn remove_from_store(&self, note_id: i64) -> Result<Note> {
        let stored = self
            .store
            .get_by_id(note_id)
            .await?
            .ok_or(PocketnotesError::NoteNotFound(note_id))?;
        self.store.delete(&stored).await?;
        Ok(stored)
    }

    /// Restores `pending` if its window is still open.
    ///
    /// Returns `Ok(false)` when there is nothing to undo any more.
    pub async fn undo(&self, pending: &PendingDeletion) -> Result<bool> {
        self.undo_by_id(pending.note.id).await
    }

    /// Restores the most recently deleted note that is still pending.
    pub async fn undo_latest(&self) -> Result<bool> {
        let latest = {
            let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            pending
                .values()
                .max_by_key(|entry| entry.deadline)
                .map(|entry| entry.note.id)
        };
        match latest {
            Some(id) => self.undo_by_id(id).await,
            None => Ok(false),
        }
    }

    pub async fn undo_by_id(&self, note_id: i64) -> Result<bool> {
        let entry = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            let open = pending
                .get(&note_id)
                .is_some_and(|entry| Instant::now() < entry.deadline);
            if open {
                pending.remove(&note_id)
            } else {
                None
            }
        };
        let Some(entry) = entry else {
            log::debug!("undo for note {note_id} ignored: window closed");
            return Ok(false);
        };
        entry.timer.abort();

        match self.store.insert(&entry.note).await {
            Ok(_) => {
                log::info!("restored note {note_id}");
                entry.outcome.send_replace(DeletionOutcome::Restored);
                self.ctx.emit(UiEffect::NoteRestored { note_id });
                Ok(true)
            }
            Err(e) => {
                log::warn!("failed to restore note {note_id}: {e}");
                self.ctx.toast(e.user_message());
                // Keep the copy around for the rest of the window so the user can retry.
                self.arm(entry.note, entry.deadline, entry.outcome);
                Err(e)
            }
        }
    }

    pub fn is_pending(&self, note_id: i64) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&note_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn arm(&self, note: Note, deadline: Instant, outcome: watch::Sender<DeletionOutcome>) {
        let note_id = note.id;
        let timer = tokio::spawn(expire_at(
            note_id,
            deadline,
            Arc::clone(&self.pending),
            self.ctx.clone(),
        ));
        let entry = Entry {
            note,
            deadline,
            outcome,
            timer,
        };
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.insert(note_id, entry) {
            previous.timer.abort();
        }
    }
}

async fn expire_at(note_id: i64, deadline: Instant, pending: PendingMap, ctx: ScreenContext) {
    tokio::time::sleep_until(deadline).await;
    let entry = pending
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&note_id);
    if let Some(entry) = entry {
        log::debug!("undo window for note {note_id} closed");
        entry.outcome.send_replace(DeletionOutcome::Finalized);
        ctx.emit(UiEffect::UndoExpired { note_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteNoteStore;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Fixture {
        store: Arc<SqliteNoteStore>,
        undo: UndoDeleteController,
        effects: UnboundedReceiver<UiEffect>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let (ctx, effects) = ScreenContext::new();
        let undo = UndoDeleteController::new(store.clone(), ctx);
        Fixture {
            store,
            undo,
            effects,
        }
    }

    async fn bookmarked(store: &SqliteNoteStore, title: &str) -> Note {
        let mut draft = Note::draft(title, Some("details".to_string()));
        draft.is_bookmarked = true;
        store.insert(&draft).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_is_immediate() {
        let mut f = fixture();
        let note = bookmarked(&f.store, "Groceries").await;

        let pending = f.undo.delete(&note).await.unwrap();

        assert!(f.store.get_all().await.unwrap().is_empty());
        assert_eq!(pending.outcome(), DeletionOutcome::Pending);
        assert!(f.undo.is_pending(note.id));
        assert_eq!(
            f.effects.try_recv().unwrap(),
            UiEffect::UndoOffered {
                note_id: note.id,
                title: "Groceries".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_within_window_restores_every_field() {
        let mut f = fixture();
        let before = bookmarked(&f.store, "Groceries").await;

        let pending = f.undo.delete(&before).await.unwrap();
        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(f.undo.undo(&pending).await.unwrap());

        let after = f.store.get_by_id(before.id).await.unwrap();
        assert_eq!(after, Some(before.clone()));
        assert_eq!(pending.outcome(), DeletionOutcome::Restored);
        assert_eq!(f.undo.pending_count(), 0);

        let _offered = f.effects.try_recv().unwrap();
        assert_eq!(
            f.effects.try_recv().unwrap(),
            UiEffect::NoteRestored { note_id: before.id }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_caller_copy_does_not_lose_bookmark() {
        let f = fixture();
        let stored = bookmarked(&f.store, "Groceries").await;
        let mut stale = stored.clone();
        stale.is_bookmarked = false;

        let pending = f.undo.delete(&stale).await.unwrap();
        assert!(pending.note.is_bookmarked);
        f.undo.undo(&pending).await.unwrap();

        assert!(f.store.get_by_id(stored.id).await.unwrap().unwrap().is_bookmarked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expiry_finalizes() {
        let mut f = fixture();
        let note = bookmarked(&f.store, "Old").await;
        let mut pending = f.undo.delete(&note).await.unwrap();

        assert_eq!(pending.settled().await, DeletionOutcome::Finalized);
        assert!(Instant::now() >= pending.deadline);
        assert!(!f.undo.is_pending(note.id));

        assert!(!f.undo.undo(&pending).await.unwrap());
        assert!(f.store.get_all().await.unwrap().is_empty());

        let _offered = f.effects.try_recv().unwrap();
        assert_eq!(
            f.effects.try_recv().unwrap(),
            UiEffect::UndoExpired { note_id: note.id }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_latest_picks_most_recent_delete() {
        let f = fixture();
        let first = bookmarked(&f.store, "first").await;
        let second = bookmarked(&f.store, "second").await;

        f.undo.delete(&first).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        f.undo.delete(&second).await.unwrap();

        assert!(f.undo.undo_latest().await.unwrap());
        let titles: Vec<String> = f
            .store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["second"]);
        assert!(f.undo.is_pending(first.id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_latest_with_nothing_pending() {
        let f = fixture();
        assert!(!f.undo.undo_latest().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleting_missing_note_fails_with_toast() {
        let mut f = fixture();
        let mut ghost = Note::draft("ghost", None);
        ghost.id = 41;

        let err = f.undo.delete(&ghost).await.unwrap_err();
        assert!(matches!(err, PocketnotesError::NoteNotFound(41)));
        assert_eq!(
            f.effects.try_recv().unwrap(),
            UiEffect::Toast("Note no longer exists".to_string())
        );
        assert_eq!(f.undo.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_window() {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let (ctx, _rx) = ScreenContext::new();
        let undo = UndoDeleteController::with_window(store.clone(), ctx, Duration::from_secs(2));
        let note = store.insert(&Note::draft("n", None)).await.unwrap();

        let pending = undo.delete(&note).await.unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;

        assert!(!undo.undo(&pending).await.unwrap());
    }
}

//! Read-only note screen.
//!
//! Deleting from here goes through the screen's own [`UndoDeleteController`].
//! The note stays on screen while the undo snackbar is up; once the window
//! closes without an undo, the screen asks to be popped since its record is
//! gone.

use crate::core::editor::write_bookmark;
use crate::{
    DeletionOutcome, Note, NoteStore, Placeholder, PocketnotesError, Result, ScreenContext,
    UiEffect, UndoDeleteController,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStatus {
    Showing,
    /// Deleted from this screen, undo window still open.
    Deleting,
    NotFound(i64),
    Failed(String),
}

pub struct NoteDetailController {
    store: Arc<dyn NoteStore>,
    ctx: ScreenContext,
    undo: UndoDeleteController,
    note: Option<Note>,
    status: DetailStatus,
}

impl NoteDetailController {
    pub async fn open(
        store: Arc<dyn NoteStore>,
        ctx: ScreenContext,
        note_id: i64,
        undo_window: Duration,
    ) -> Self {
        let (note, status) = match store.get_by_id(note_id).await {
            Ok(Some(note)) => (Some(note), DetailStatus::Showing),
            Ok(None) => (None, DetailStatus::NotFound(note_id)),
            Err(e) => {
                log::warn!("failed to load note {note_id}: {e}");
                (None, DetailStatus::Failed(e.user_message()))
            }
        };
        let undo = UndoDeleteController::with_window(Arc::clone(&store), ctx.clone(), undo_window);
        Self {
            store,
            ctx,
            undo,
            note,
            status,
        }
    }

    pub fn note(&self) -> Option<&Note> {
        self.note.as_ref()
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    /// Neutral message shown instead of the note body, if any.
    pub fn placeholder(&self) -> Option<Placeholder> {
        match &self.status {
            DetailStatus::Showing | DetailStatus::Deleting => None,
            DetailStatus::NotFound(id) => Some(Placeholder::Error(
                PocketnotesError::NoteNotFound(*id).user_message(),
            )),
            DetailStatus::Failed(msg) => Some(Placeholder::Error(msg.clone())),
        }
    }

    fn current(&self) -> Result<&Note> {
        match (&self.status, &self.note) {
            (DetailStatus::Showing, Some(note)) => Ok(note),
            (DetailStatus::NotFound(id), _) => Err(PocketnotesError::NoteNotFound(*id)),
            (_, note) => Err(PocketnotesError::NoteNotFound(note.as_ref().map_or(0, |n| n.id))),
        }
    }

    /// Flips the bookmark and writes it to the store.
    pub async fn toggle_bookmark(&mut self) -> Result<()> {
        let (id, bookmarked) = {
            let note = self.current()?;
            (note.id, !note.is_bookmarked)
        };
        match write_bookmark(self.store.as_ref(), id, bookmarked).await {
            Ok(updated) => {
                self.note = Some(updated);
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to toggle bookmark on note {id}: {e}");
                self.ctx.toast(e.user_message());
                Err(e)
            }
        }
    }

    pub fn edit(&self) -> Result<()> {
        let id = self.current()?.id;
        self.ctx.emit(UiEffect::OpenEditor(id));
        Ok(())
    }

    /// Deletes the note and offers undo.
    ///
    /// The returned task resolves once the undo window settles; if it closed
    /// without an undo it emits [`UiEffect::NavigateBack`] first.
    pub async fn delete(&mut self) -> Result<JoinHandle<DeletionOutcome>> {
        let note = self.current()?.clone();
        let mut pending = self.undo.delete(&note).await?;
        self.status = DetailStatus::Deleting;

        let ctx = self.ctx.clone();
        Ok(tokio::spawn(async move {
            let outcome = pending.settled().await;
            if outcome == DeletionOutcome::Finalized {
                ctx.emit(UiEffect::NavigateBack);
            }
            outcome
        }))
    }

    /// Undo affordance of the snackbar.
    pub async fn undo(&mut self) -> Result<bool> {
        let restored = self.undo.undo_latest().await?;
        if restored && self.status == DetailStatus::Deleting {
            self.status = DetailStatus::Showing;
        }
        Ok(restored)
    }
}

//! Add/edit screen.

use crate::{Note, NoteStore, Placeholder, PocketnotesError, Result, ScreenContext, UiEffect};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorStatus {
    Ready,
    /// The requested note does not exist (e.g. it was deleted meanwhile).
    NotFound(i64),
    Failed(String),
}

pub struct EditorController {
    store: Arc<dyn NoteStore>,
    ctx: ScreenContext,
    draft: Note,
    status: EditorStatus,
}

impl EditorController {
    /// Opens the editor for `note_id`, or a blank draft when `note_id` is not
    /// a stored id (`NEW_NOTE_ID` or any other value below 1).
    pub async fn open(store: Arc<dyn NoteStore>, ctx: ScreenContext, note_id: i64) -> Self {
        let (draft, status) = if note_id <= 0 {
            (Note::default(), EditorStatus::Ready)
        } else {
            match store.get_by_id(note_id).await {
                Ok(Some(note)) => (note, EditorStatus::Ready),
                Ok(None) => (Note::default(), EditorStatus::NotFound(note_id)),
                Err(e) => {
                    log::warn!("failed to load note {note_id} for editing: {e}");
                    (Note::default(), EditorStatus::Failed(e.user_message()))
                }
            }
        };
        Self {
            store,
            ctx,
            draft,
            status,
        }
    }

    pub fn draft(&self) -> &Note {
        &self.draft
    }

    pub fn status(&self) -> &EditorStatus {
        &self.status
    }

    pub fn is_new(&self) -> bool {
        !self.draft.is_persisted()
    }

    /// Message to show instead of the form, if any.
    pub fn placeholder(&self) -> Option<Placeholder> {
        match &self.status {
            EditorStatus::Ready => None,
            EditorStatus::NotFound(id) => Some(Placeholder::Error(
                PocketnotesError::NoteNotFound(*id).user_message(),
            )),
            EditorStatus::Failed(msg) => Some(Placeholder::Error(msg.clone())),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    /// An empty description is stored as none.
    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.draft.description = (!description.is_empty()).then_some(description);
    }

    /// Flips the bookmark on the draft. For a note that already exists the
    /// flag is written to the store right away; unsaved title and description
    /// edits are not.
    ///
    /// # Errors
    ///
    /// Returns any store error; the draft keeps the new flag either way.
    pub async fn set_bookmarked(&mut self, bookmarked: bool) -> Result<()> {
        self.draft.is_bookmarked = bookmarked;
        if !self.draft.is_persisted() {
            return Ok(());
        }
        let result = write_bookmark(self.store.as_ref(), self.draft.id, bookmarked).await;
        if let Err(e) = &result {
            log::warn!("failed to update bookmark on note {}: {e}", self.draft.id);
            self.ctx.toast(e.user_message());
        }
        result.map(|_| ())
    }

    /// Validates and persists the draft, then asks to leave the screen.
    ///
    /// # Errors
    ///
    /// Returns [`PocketnotesError::Validation`] for a blank title without
    /// touching the store, or any store error. Both show a toast. An editor
    /// opened on a missing note refuses to save rather than create a new one.
    pub async fn save(&mut self) -> Result<Note> {
        if let EditorStatus::NotFound(id) = self.status {
            return Err(PocketnotesError::NoteNotFound(id));
        }
        if let Err(e) = self.draft.validate_for_save() {
            self.ctx.toast(e.user_message());
            return Err(e);
        }

        let result = if self.draft.is_persisted() {
            self.store.update(&self.draft).await
        } else {
            self.store.insert(&self.draft).await
        };

        match result {
            Ok(saved) => {
                log::info!("saved note {} ({:?})", saved.id, saved.title);
                self.draft = saved.clone();
                self.ctx.emit(UiEffect::NavigateBack);
                Ok(saved)
            }
            Err(e) => {
                log::warn!("failed to save note {}: {e}", self.draft.id);
                self.ctx.toast(e.user_message());
                Err(e)
            }
        }
    }
}

/// Sets only the bookmark flag of the stored note.
pub(crate) async fn write_bookmark(
    store: &dyn NoteStore,
    note_id: i64,
    bookmarked: bool,
) -> Result<Note> {
    let mut stored = store
        .get_by_id(note_id)
        .await?
        .ok_or(PocketnotesError::NoteNotFound(note_id))?;
    stored.is_bookmarked = bookmarked;
    store.update(&stored).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SqliteNoteStore, NEW_NOTE_ID};
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn editor(
        store: &Arc<SqliteNoteStore>,
        note_id: i64,
    ) -> (EditorController, UnboundedReceiver<UiEffect>) {
        let (ctx, rx) = ScreenContext::new();
        (EditorController::open(store.clone(), ctx, note_id).await, rx)
    }

    #[tokio::test]
    async fn test_new_note_is_inserted() {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let (mut ed, mut rx) = editor(&store, NEW_NOTE_ID).await;
        assert!(ed.is_new());

        ed.set_title("Groceries");
        ed.set_description("milk, eggs");
        let saved = ed.save().await.unwrap();

        assert!(saved.is_persisted());
        assert_eq!(store.get_all().await.unwrap(), vec![saved]);
        assert_eq!(rx.try_recv().unwrap(), UiEffect::NavigateBack);
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_store() {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let revisions = store.subscribe();
        let (mut ed, mut rx) = editor(&store, NEW_NOTE_ID).await;

        ed.set_title("   ");
        let err = ed.save().await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(*revisions.borrow(), 0);
        assert!(store.get_all().await.unwrap().is_empty());
        assert_eq!(
            rx.try_recv().unwrap(),
            UiEffect::Toast("Title can't be empty".to_string())
        );
    }

    #[tokio::test]
    async fn test_edit_existing_note_updates_in_place() {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let note = store.insert(&Note::draft("Draft", None)).await.unwrap();

        let (mut ed, _rx) = editor(&store, note.id).await;
        assert_eq!(ed.draft().title, "Draft");
        ed.set_title("Final");
        ed.set_description("");
        ed.save().await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, note.id);
        assert_eq!(all[0].title, "Final");
        assert_eq!(all[0].description, None);
    }

    #[tokio::test]
    async fn test_bookmark_writes_through_for_existing_note_only() {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let note = store.insert(&Note::draft("Stored", None)).await.unwrap();

        let (mut ed, _rx) = editor(&store, note.id).await;
        ed.set_title("unsaved edit");
        ed.set_bookmarked(true).await.unwrap();

        let stored = store.get_by_id(note.id).await.unwrap().unwrap();
        assert!(stored.is_bookmarked);
        assert_eq!(stored.title, "Stored");

        let (mut fresh, _rx) = editor(&store, NEW_NOTE_ID).await;
        fresh.set_bookmarked(true).await.unwrap();
        assert!(fresh.draft().is_bookmarked);
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_note_shows_neutral_message() {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let (ed, _rx) = editor(&store, 404).await;

        assert_eq!(ed.status(), &EditorStatus::NotFound(404));
        assert_eq!(
            ed.placeholder(),
            Some(Placeholder::Error("Note no longer exists".to_string()))
        );
    }

    #[tokio::test]
    async fn test_missing_note_is_not_recreated_on_save() {
        let store = Arc::new(SqliteNoteStore::in_memory().unwrap());
        let (mut ed, _rx) = editor(&store, 404).await;
        ed.set_title("resurrected");

        let err = ed.save().await.unwrap_err();
        assert!(matches!(err, PocketnotesError::NoteNotFound(404)));
        assert!(store.get_all().await.unwrap().is_empty());
    }
}

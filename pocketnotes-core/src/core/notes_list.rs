//! Main note list and favourites.
//!
//! Both screens show the store's full note collection; favourites keeps only
//! bookmarked notes. The list follows the store's revision counter, so a
//! delete, restore or bookmark toggle anywhere shows up without a manual
//! reload.
//!
//! Cards can be deleted straight from the list; the screen keeps its own
//! undo window for those deletes.

use crate::{
    render_note_cards, ListRendering, Note, NoteCard, NoteStore, PendingDeletion, Placeholder,
    Result, ScreenContext, UndoDeleteController,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Bookmarked,
}

impl ListFilter {
    fn apply(self, notes: Vec<Note>) -> Vec<Note> {
        match self {
            Self::All => notes,
            Self::Bookmarked => notes.into_iter().filter(|n| n.is_bookmarked).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Loaded(Vec<Note>),
    /// The last load failed; `last_known` is what was on screen before.
    Failed {
        message: String,
        last_known: Vec<Note>,
    },
}

impl ListView {
    pub fn render(&self) -> ListRendering<NoteCard> {
        match self {
            Self::Loading => ListRendering::Placeholder(Placeholder::Loading),
            Self::Loaded(notes) => render_note_cards(notes, Placeholder::Empty),
            Self::Failed { message, .. } => {
                ListRendering::Placeholder(Placeholder::Error(message.clone()))
            }
        }
    }

    pub fn notes(&self) -> &[Note] {
        match self {
            Self::Loading => &[],
            Self::Loaded(notes) => notes,
            Self::Failed { last_known, .. } => last_known,
        }
    }
}

pub struct NoteListController {
    store: Arc<dyn NoteStore>,
    filter: ListFilter,
    view: Arc<watch::Sender<ListView>>,
    undo: UndoDeleteController,
    follower: JoinHandle<()>,
}

impl NoteListController {
    /// Starts loading immediately. Must be called inside a tokio runtime.
    pub fn new(store: Arc<dyn NoteStore>, ctx: ScreenContext, filter: ListFilter) -> Self {
        Self::with_undo_window(store, ctx, filter, crate::UNDO_WINDOW)
    }

    pub fn with_undo_window(
        store: Arc<dyn NoteStore>,
        ctx: ScreenContext,
        filter: ListFilter,
        undo_window: Duration,
    ) -> Self {
        let (tx, _) = watch::channel(ListView::Loading);
        let view = Arc::new(tx);
        let follower = tokio::spawn(follow_store(
            Arc::clone(&store),
            filter,
            Arc::clone(&view),
        ));
        let undo = UndoDeleteController::with_window(Arc::clone(&store), ctx, undo_window);
        Self {
            store,
            filter,
            view,
            undo,
            follower,
        }
    }

    pub fn filter(&self) -> ListFilter {
        self.filter
    }

    pub fn subscribe(&self) -> watch::Receiver<ListView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> ListView {
        self.view.borrow().clone()
    }

    /// Reloads now, independent of store notifications.
    ///
    /// # Errors
    ///
    /// Returns the store error; the view switches to [`ListView::Failed`].
    pub async fn refresh(&self) -> Result<()> {
        load(self.store.as_ref(), self.filter, &self.view).await
    }

    /// Delete action of a note card. The list drops the note on the next
    /// store revision; undo puts it back.
    pub async fn delete(&self, note_id: i64) -> Result<PendingDeletion> {
        self.undo.delete_by_id(note_id).await
    }

    /// Undo affordance of the snackbar: restores the most recent delete made
    /// from this list.
    pub async fn undo_latest(&self) -> Result<bool> {
        self.undo.undo_latest().await
    }
}

impl Drop for NoteListController {
    fn drop(&mut self) {
        self.follower.abort();
    }
}

async fn load(
    store: &dyn NoteStore,
    filter: ListFilter,
    view: &watch::Sender<ListView>,
) -> Result<()> {
    match store.get_all().await {
        Ok(notes) => {
            view.send_replace(ListView::Loaded(filter.apply(notes)));
            Ok(())
        }
        Err(e) => {
            log::warn!("failed to load notes: {e}");
            let message = e.user_message();
            view.send_modify(|v| {
                let last_known = v.notes().to_vec();
                *v = ListView::Failed {
                    message,
                    last_known,
                };
            });
            Err(e)
        }
    }
}

async fn follow_store(
    store: Arc<dyn NoteStore>,
    filter: ListFilter,
    view: Arc<watch::Sender<ListView>>,
) {
    let mut revisions = store.subscribe();
    loop {
        // Failures are already reflected in the view.
        let _ = load(store.as_ref(), filter, &view).await;
        if revisions.changed().await.is_err() {
            break;
        }
    }
}

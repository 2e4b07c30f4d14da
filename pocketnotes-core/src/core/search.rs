//! Search-as-you-type with a suggestion/confirmed toggle.
//!
//! Every keystroke issues a live "contains" query and flips the screen into
//! [`SearchMode::Suggesting`]; submitting (or picking a suggestion) issues
//! the same query and flips it into [`SearchMode::Confirmed`].
//!
//! Queries run on the tokio runtime and may complete in any order. Each one
//! is tagged with the view's `generation` at issue time, and its result is
//! only published if the generation is still current when it arrives. The
//! check and the publish happen under the watch channel's lock, the same
//! lock under which the controller bumps the generation, so a stale result
//! can never overwrite a newer one. A refresh after a store change is a new
//! query in its own right and takes a fresh generation too.

use crate::{
    contains_pattern, render_note_cards, render_titles, ListRendering, Note, NoteCard, NoteStore,
    PendingDeletion, Placeholder, PocketnotesError, Result, ScreenContext, UiEffect,
    UndoDeleteController,
};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Live candidates while the user types.
    #[default]
    Suggesting,
    /// The committed result set after submit or suggestion pick.
    Confirmed,
}

/// Text field contents and mode. Lives only as long as the search screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query_text: String,
    pub mode: SearchMode,
}

/// Snapshot published to the search screen on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchView {
    pub state: SearchState,
    /// Results of the current query; `None` when no query is active.
    pub results: Option<Vec<Note>>,
    /// Message from the last failed query; `results` keeps the last good set.
    pub error: Option<String>,
    /// A query for the current generation has not answered yet.
    pub in_flight: bool,
    /// Bumped whenever a new query is issued or the results are cleared.
    pub generation: u64,
}

/// What the search screen should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRendering {
    Placeholder(Placeholder),
    /// Title-only rows, tappable to confirm.
    Suggestions(Vec<String>),
    /// Full note cards, same as the main list.
    Notes(Vec<NoteCard>),
}

impl SearchView {
    pub fn render(&self) -> SearchRendering {
        if let Some(message) = &self.error {
            return SearchRendering::Placeholder(Placeholder::Error(message.clone()));
        }
        let Some(notes) = &self.results else {
            return SearchRendering::Placeholder(Placeholder::SearchPrompt);
        };
        match self.state.mode {
            SearchMode::Suggesting => match render_titles(notes, Placeholder::NoMatches) {
                ListRendering::Items(titles) => SearchRendering::Suggestions(titles),
                ListRendering::Placeholder(p) => SearchRendering::Placeholder(p),
            },
            SearchMode::Confirmed => match render_note_cards(notes, Placeholder::NoMatches) {
                ListRendering::Items(cards) => SearchRendering::Notes(cards),
                ListRendering::Placeholder(p) => SearchRendering::Placeholder(p),
            },
        }
    }
}

/// Drives the search screen.
///
/// Must be created and used from within a tokio runtime; dropping it stops
/// the background refresh that follows store changes.
pub struct SearchController {
    store: Arc<dyn NoteStore>,
    ctx: ScreenContext,
    view: Arc<watch::Sender<SearchView>>,
    undo: UndoDeleteController,
    refresher: JoinHandle<()>,
}

impl SearchController {
    pub fn new(store: Arc<dyn NoteStore>, ctx: ScreenContext) -> Self {
        let (tx, _) = watch::channel(SearchView::default());
        let view = Arc::new(tx);
        let refresher = tokio::spawn(refresh_on_store_change(
            Arc::clone(&store),
            Arc::clone(&view),
        ));
        let undo = UndoDeleteController::new(Arc::clone(&store), ctx.clone());
        Self {
            store,
            ctx,
            view,
            undo,
            refresher,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    /// Current snapshot.
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Called on every edit of the search field.
    ///
    /// Returns the handle of the live query, or `None` when `text` is empty
    /// and the candidate list was simply cleared.
    pub fn on_query_changed(&mut self, text: impl Into<String>) -> Option<JoinHandle<()>> {
        let text = text.into();
        if text.is_empty() {
            self.view.send_modify(|v| {
                v.state.query_text.clear();
                v.state.mode = SearchMode::Suggesting;
                v.results = None;
                v.error = None;
                v.in_flight = false;
                v.generation += 1;
            });
            return None;
        }
        Some(self.issue_query(text, SearchMode::Suggesting))
    }

    /// Commits the current query.
    ///
    /// # Errors
    ///
    /// Returns [`PocketnotesError::Validation`] (and shows a toast) when the
    /// field is empty; no query is issued in that case.
    pub fn on_submit(&mut self) -> Result<JoinHandle<()>> {
        let text = self.view.borrow().state.query_text.clone();
        if text.is_empty() {
            let err = PocketnotesError::Validation("Search field can't be empty".to_string());
            self.ctx.toast(err.user_message());
            return Err(err);
        }
        let handle = self.issue_query(text, SearchMode::Confirmed);
        self.ctx.emit(UiEffect::DismissKeyboard);
        Ok(handle)
    }

    /// Same as typing `title` and submitting.
    pub fn on_suggestion_picked(&mut self, title: impl Into<String>) -> Result<JoinHandle<()>> {
        let title = title.into();
        self.view.send_modify(|v| v.state.query_text = title);
        self.on_submit()
    }

    /// Delete action of a result card. The refresher drops it from the
    /// results once the store changes.
    pub async fn delete(&self, note_id: i64) -> Result<PendingDeletion> {
        self.undo.delete_by_id(note_id).await
    }

    pub async fn undo_latest(&self) -> Result<bool> {
        self.undo.undo_latest().await
    }

    fn issue_query(&mut self, text: String, mode: SearchMode) -> JoinHandle<()> {
        let pattern = contains_pattern(&text);
        let mut generation = 0;
        self.view.send_modify(|v| {
            v.state.query_text = text;
            v.state.mode = mode;
            v.in_flight = true;
            v.generation += 1;
            generation = v.generation;
        });
        log::debug!("search #{generation}: {pattern:?} ({mode:?})");

        let store = Arc::clone(&self.store);
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            let result = store.search(&pattern).await;
            publish_results(&view, generation, result);
        })
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.refresher.abort();
    }
}

fn publish_results(
    view: &watch::Sender<SearchView>,
    generation: u64,
    result: Result<Vec<Note>>,
) -> bool {
    view.send_if_modified(|v| {
        if v.generation != generation {
            log::debug!(
                "discarding stale search #{generation} (current #{})",
                v.generation
            );
            return false;
        }
        v.in_flight = false;
        match result {
            Ok(notes) => {
                v.results = Some(notes);
                v.error = None;
            }
            Err(e) => {
                log::warn!("search #{generation} failed: {e}");
                v.error = Some(e.user_message());
            }
        }
        true
    })
}

/// Re-runs the active query whenever the store changes, so deletes and
/// edits show up in the result list without another keystroke.
async fn refresh_on_store_change(
    store: Arc<dyn NoteStore>,
    view: Arc<watch::Sender<SearchView>>,
) {
    let mut revisions = store.subscribe();
    while revisions.changed().await.is_ok() {
        let mut issued = None;
        view.send_if_modified(|v| {
            if v.results.is_none() && !v.in_flight {
                return false;
            }
            v.generation += 1;
            v.in_flight = true;
            issued = Some((v.generation, v.state.query_text.clone()));
            true
        });
        let Some((generation, text)) = issued else {
            continue;
        };
        log::debug!("search #{generation}: refreshing {text:?} after store change");
        let result = store.search(&contains_pattern(&text)).await;
        publish_results(&view, generation, result);
    }
}

//! Core library for Pocketnotes, a small note-taking application.
//!
//! Notes live in a [`NoteStore`] (SQLite by default, see [`SqliteNoteStore`]).
//! Each screen gets a controller that owns only its own state and talks to
//! the front end through two channels: a `watch` receiver of view snapshots
//! and the [`ScreenContext`] effect queue (toasts, undo snackbar,
//! navigation).
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    context::{ScreenContext, UiEffect},
    detail::{DetailStatus, NoteDetailController},
    editor::{EditorController, EditorStatus},
    error::{PocketnotesError, Result},
    list::{render_note_cards, render_titles, ListActions, ListRendering, NoteCard, Placeholder},
    note::{Note, NEW_NOTE_ID},
    notes_list::{ListFilter, ListView, NoteListController},
    search::{SearchController, SearchMode, SearchRendering, SearchState, SearchView},
    settings::{
        load_settings, load_settings_from, save_settings, save_settings_to, settings_file_path,
        AppSettings,
    },
    sqlite_store::SqliteNoteStore,
    storage::Storage,
    store::{contains_pattern, NoteStore, LIKE_ESCAPE},
    undo::{DeletionOutcome, PendingDeletion, UndoDeleteController, UNDO_WINDOW},
};

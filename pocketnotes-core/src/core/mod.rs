//! Internal domain modules for the Pocketnotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod context;
pub mod detail;
pub mod editor;
pub mod error;
pub mod list;
pub mod note;
pub mod notes_list;
pub mod search;
pub mod settings;
pub mod sqlite_store;
pub mod storage;
pub mod store;
pub mod undo;

#[doc(inline)]
pub use context::{ScreenContext, UiEffect};
#[doc(inline)]
pub use detail::{DetailStatus, NoteDetailController};
#[doc(inline)]
pub use editor::{EditorController, EditorStatus};
#[doc(inline)]
pub use error::{PocketnotesError, Result};
#[doc(inline)]
pub use list::{
    render_note_cards, render_titles, ListActions, ListRendering, NoteCard, Placeholder,
};
#[doc(inline)]
pub use note::{Note, NEW_NOTE_ID};
#[doc(inline)]
pub use notes_list::{ListFilter, ListView, NoteListController};
#[doc(inline)]
pub use search::{SearchController, SearchMode, SearchRendering, SearchState, SearchView};
#[doc(inline)]
pub use settings::{load_settings, save_settings, AppSettings};
#[doc(inline)]
pub use sqlite_store::SqliteNoteStore;
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use store::{contains_pattern, NoteStore};
#[doc(inline)]
pub use undo::{DeletionOutcome, PendingDeletion, UndoDeleteController, UNDO_WINDOW};

//! List presentation contract shared by the main, favourites and search screens.
//!
//! A list never renders as an empty region: zero rows always become a
//! [`Placeholder`].

use crate::{Note, ScreenContext, UiEffect};

/// What to show instead of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    /// The store holds no notes (or no favourites).
    Empty,
    /// The search field has not produced a query yet.
    SearchPrompt,
    /// A search ran and matched nothing.
    NoMatches,
    Error(String),
}

impl Placeholder {
    pub fn label(&self) -> &str {
        match self {
            Self::Loading => "Loading...",
            Self::Empty => "No notes yet",
            Self::SearchPrompt => "Search Notes",
            Self::NoMatches => "No notes found with the given title",
            Self::Error(msg) if msg.is_empty() => "Something went wrong",
            Self::Error(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRendering<T> {
    Placeholder(Placeholder),
    Items(Vec<T>),
}

impl<T> ListRendering<T> {
    /// Rows when there are any, `placeholder` otherwise.
    pub fn from_items(items: Vec<T>, placeholder: Placeholder) -> Self {
        if items.is_empty() {
            Self::Placeholder(placeholder)
        } else {
            Self::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Items(items) => items,
            Self::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            Self::Placeholder(p) => Some(p),
            Self::Items(_) => None,
        }
    }
}

/// Row callbacks.
pub trait ListActions {
    fn on_select(&self, note_id: i64);
    fn on_edit(&self, note_id: i64);
    fn on_delete(&self, note_id: i64);
}

/// Tapping opens the detail screen and the edit action opens the editor.
/// Delete is handed to the screen's controller, which owns the undo window.
impl ListActions for ScreenContext {
    fn on_select(&self, note_id: i64) {
        self.emit(UiEffect::OpenNote(note_id));
    }

    fn on_edit(&self, note_id: i64) {
        self.emit(UiEffect::OpenEditor(note_id));
    }

    fn on_delete(&self, note_id: i64) {
        self.emit(UiEffect::DeleteRequested(note_id));
    }
}

/// One note rendered as a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_bookmarked: bool,
}

impl NoteCard {
    pub fn select(&self, actions: &dyn ListActions) {
        actions.on_select(self.id);
    }

    pub fn edit(&self, actions: &dyn ListActions) {
        actions.on_edit(self.id);
    }

    pub fn delete(&self, actions: &dyn ListActions) {
        actions.on_delete(self.id);
    }
}

impl From<&Note> for NoteCard {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            description: note.description.clone().unwrap_or_default(),
            is_bookmarked: note.is_bookmarked,
        }
    }
}

/// Full note cards, or `placeholder` when `notes` is empty.
pub fn render_note_cards(notes: &[Note], placeholder: Placeholder) -> ListRendering<NoteCard> {
    ListRendering::from_items(notes.iter().map(NoteCard::from).collect(), placeholder)
}

/// Title-only rows, as used for search suggestions.
pub fn render_titles(notes: &[Note], placeholder: Placeholder) -> ListRendering<String> {
    ListRendering::from_items(notes.iter().map(|n| n.title.clone()).collect(), placeholder)
}

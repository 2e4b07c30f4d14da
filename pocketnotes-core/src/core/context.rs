//! Per-screen context handed to controllers at construction time.
//!
//! A screen owns one [`ScreenContext`] for as long as it is on the back
//! stack. Controllers push one-shot [`UiEffect`]s into it (toasts, the undo
//! snackbar, navigation requests); the front end drains the paired
//! receiver. Dropping the receiver tears the screen down: later effects are
//! silently discarded.

use tokio::sync::mpsc;

/// A one-shot instruction from a controller to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Show a short transient message.
    Toast(String),
    /// Hide the on-screen keyboard.
    DismissKeyboard,
    /// Show the "Undo" snackbar for a note that was just deleted.
    UndoOffered { note_id: i64, title: String },
    /// The undo window for `note_id` closed; hide the snackbar.
    UndoExpired { note_id: i64 },
    /// A deleted note was put back.
    NoteRestored { note_id: i64 },
    /// Pop the current screen.
    NavigateBack,
    /// Open the add/edit screen for a note (`NEW_NOTE_ID` for a new one).
    OpenEditor(i64),
    /// Open the read-only detail screen for a note.
    OpenNote(i64),
    /// The delete action on a note card was used.
    DeleteRequested(i64),
}

#[derive(Debug, Clone)]
pub struct ScreenContext {
    effects: mpsc::UnboundedSender<UiEffect>,
}

impl ScreenContext {
    /// Creates a context and the receiver the front end drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEffect>) {
        let (effects, rx) = mpsc::unbounded_channel();
        (Self { effects }, rx)
    }

    pub fn emit(&self, effect: UiEffect) {
        if self.effects.send(effect).is_err() {
            log::debug!("screen closed; dropping UI effect");
        }
    }

    pub fn toast(&self, message: impl Into<String>) {
        self.emit(UiEffect::Toast(message.into()));
    }
}

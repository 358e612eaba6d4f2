//! One-shot UI events sent from controllers to the host.
//!
//! Controllers never talk to the UI directly. They are handed an
//! [`EventSink`] and emit [`AppEvent`]s into it; the host drains them and
//! shows snackbars or navigates.

use serde::Serialize;
use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnackbarMessage {
    NoteAdded,
    NoteUpdated,
    NoteDeleted,
}

impl SnackbarMessage {
    pub fn text(self) -> &'static str {
        match self {
            Self::NoteAdded => "Note added",
            Self::NoteUpdated => "Note updated",
            Self::NoteDeleted => "Note deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AppEvent {
    ShowSnackbar { message: SnackbarMessage },
    /// Open the detail screen; `None` starts a new note.
    #[serde(rename_all = "camelCase")]
    NavigateToDetail { note_id: Option<String> },
    /// Leave the current screen.
    ExitScreen,
}

pub trait EventSink {
    fn emit(&self, event: AppEvent);
}

/// [`EventSink`] backed by an `mpsc` channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: Sender<AppEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: Sender<AppEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: AppEvent) {
        log::debug!("emitting {event:?}");
        if self.sender.send(event).is_err() {
            log::warn!("event receiver dropped; event discarded");
        }
    }
}

/// A connected sink and receiver.
pub fn event_channel() -> (ChannelEventSink, Receiver<AppEvent>) {
    let (sender, receiver) = channel();
    (ChannelEventSink::new(sender), receiver)
}

use actor_protocol::{ActorError, SessionEndReason, SessionEvent, ShellCommand};
use futures_channel::mpsc;

/// Messages processed by the ReaderActor
#[derive(Debug, Clone)]
pub enum ReaderMessage {
    /// Commands from the shell
    Command(ShellCommand),

    /// A session's background thread has finished (sent by the session itself)
    SessionFinished {
        /// Session sequence number, to drop reports from superseded sessions
        session_id: u32,
        reason: SessionEndReason,
    },
}

/// Handles for spawning actors
pub struct ActorHandles {
    pub reader_rx: mpsc::Receiver<ReaderMessage>,
    pub event_tx: mpsc::UnboundedSender<SessionEvent>,
}

/// Channel manager for shell ↔ actor communication
///
/// Commands travel on a bounded channel: the shell is a human pressing
/// buttons, so a full queue means something is wrong. Events travel on an
/// unbounded channel because every accepted tag must reach the shell, in
/// order, and the background reader must never block on the display.
pub struct ChannelManager {
    reader_tx: mpsc::Sender<ReaderMessage>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
}

impl ChannelManager {
    /// Create a new channel manager and actor handles
    ///
    /// Returns (ChannelManager for the shell, ActorHandles for spawning actors)
    pub fn new() -> (Self, ActorHandles) {
        let (reader_tx, reader_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::unbounded();

        let handles = ActorHandles {
            reader_rx,
            event_tx: event_tx.clone(),
        };

        let manager = Self {
            reader_tx,
            event_tx,
            event_rx: Some(event_rx),
        };

        (manager, handles)
    }

    /// Send a shell command to the ReaderActor
    pub fn send_command(&self, cmd: ShellCommand) -> Result<(), ActorError> {
        self.reader_tx
            .clone()
            .try_send(ReaderMessage::Command(cmd))
            .map_err(|e| {
                if e.is_full() {
                    ActorError::Other(
                        "Reader overloaded: too many pending commands. Wait for the current one to finish."
                            .into(),
                    )
                } else {
                    ActorError::ChannelClosed(
                        "ReaderActor has shut down. Restart the application.".into(),
                    )
                }
            })
    }

    /// Take ownership of the event receiver
    ///
    /// Returns None if it was already taken; events are only delivered once.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.event_rx.take()
    }

    /// Clone senders for actors and sessions
    pub fn reader_sender(&self) -> mpsc::Sender<ReaderMessage> {
        self.reader_tx.clone()
    }

    pub fn event_sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.event_tx.clone()
    }
}

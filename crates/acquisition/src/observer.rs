use actor_protocol::{SessionEndReason, SessionEvent, SessionState};
use actor_runtime::{actor_warn, ReaderMessage};
use core_types::TagToken;
use futures_channel::mpsc;

/// Receiver of acquisition notifications.
///
/// Called on the session's background thread, in the order things happen.
/// Implementations that drive a display must marshal to the foreground
/// themselves; [`ChannelObserver`] does that with a channel.
pub trait SessionObserver: Send + Sync {
    /// A token entered the registry; `count` already includes it.
    fn on_tag_accepted(&self, token: &TagToken, count: usize, timestamp_us: u64);

    /// Final notification of a session. Nothing follows it.
    fn on_session_ended(&self, reason: &SessionEndReason);

    fn on_status_changed(&self, status: &str);

    fn on_state_changed(&self, _state: SessionState) {}
}

/// Forwards every notification as a [`SessionEvent`] to the foreground.
///
/// With [`with_completion`](Self::with_completion) it also tells the reader
/// actor which session finished, so the actor can reap it.
pub struct ChannelObserver {
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    completion: Option<(mpsc::Sender<ReaderMessage>, u32)>,
}

impl ChannelObserver {
    pub fn new(event_tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            event_tx,
            completion: None,
        }
    }

    pub fn with_completion(mut self, reader_tx: mpsc::Sender<ReaderMessage>, session_id: u32) -> Self {
        self.completion = Some((reader_tx, session_id));
        self
    }

    fn send(&self, event: SessionEvent) {
        // Shell gone means nobody is watching; acquisition carries on.
        if let Err(e) = self.event_tx.unbounded_send(event) {
            actor_warn!("Session event dropped: {:?}", e.into_inner());
        }
    }
}

impl SessionObserver for ChannelObserver {
    fn on_tag_accepted(&self, token: &TagToken, count: usize, timestamp_us: u64) {
        self.send(SessionEvent::TagAccepted {
            token: token.clone(),
            count,
            timestamp_us,
        });
    }

    fn on_session_ended(&self, reason: &SessionEndReason) {
        self.send(SessionEvent::SessionEnded {
            reason: reason.clone(),
        });

        if let Some((reader_tx, session_id)) = &self.completion {
            let msg = ReaderMessage::SessionFinished {
                session_id: *session_id,
                reason: reason.clone(),
            };
            if let Err(e) = reader_tx.clone().try_send(msg) {
                actor_warn!(session_id, "SessionFinished not delivered: {}", e);
            }
        }
    }

    fn on_status_changed(&self, status: &str) {
        self.send(SessionEvent::StatusChanged {
            message: status.to_string(),
        });
    }

    fn on_state_changed(&self, state: SessionState) {
        self.send(SessionEvent::StateChanged { state });
    }
}

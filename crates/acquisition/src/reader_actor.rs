use crate::observer::ChannelObserver;
use crate::registry::DedupRegistry;
use crate::session::AcquisitionSession;
use actor_protocol::{ActorError, SessionEndReason, SessionEvent, SessionState, ShellCommand};
use actor_runtime::{actor_debug, actor_info, actor_warn, Actor, ReaderMessage};
use core_types::{ConnectionConfig, LineSource};
use futures_channel::mpsc;
use std::sync::Arc;

/// ReaderActor is the foreground controller of tag acquisition
///
/// Responsibilities:
/// - Start and stop acquisition sessions on shell request
/// - Keep at most one session alive per line source
/// - Guard the registry's clear operation against a running session
/// - Reap finished sessions when their background thread reports back
///
/// Session lifecycle itself lives in [`AcquisitionSession`]; see
/// `actor-protocol/src/state.rs` for the state diagram.
pub struct ReaderActor {
    source: Arc<dyn LineSource>,
    registry: Arc<DedupRegistry>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,

    // Channel back to self, handed to each session for completion reports
    reader_tx: mpsc::Sender<ReaderMessage>,

    session: Option<AcquisitionSession>,

    // Incremented on each start, used to ignore reports from reaped sessions
    session_sequence: u32,
}

impl ReaderActor {
    pub fn new(
        source: Arc<dyn LineSource>,
        registry: Arc<DedupRegistry>,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
        reader_tx: mpsc::Sender<ReaderMessage>,
    ) -> Self {
        Self {
            source,
            registry,
            event_tx,
            reader_tx,
            session: None,
            session_sequence: 0,
        }
    }

    pub fn registry(&self) -> &Arc<DedupRegistry> {
        &self.registry
    }

    /// State of the current session, `Idle` when there is none.
    pub fn session_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, AcquisitionSession::state)
    }

    fn next_session_id(&mut self) -> u32 {
        self.session_sequence = self.session_sequence.wrapping_add(1);
        self.session_sequence
    }

    fn send_ui_event(&self, event: SessionEvent) {
        if let Err(e) = self.event_tx.unbounded_send(event) {
            actor_warn!("UI event dropped: {:?}", e.into_inner());
        }
    }

    fn unexpected(&self, message: &str) -> ActorError {
        ActorError::UnexpectedMessage {
            state: format!("{:?}", self.session_state()),
            message: message.into(),
        }
    }

    /// Join the current session's thread.
    ///
    /// Blocks the calling task. Callers reach this either after
    /// `SessionFinished`, when the thread has already returned, or right
    /// after [`AcquisitionSession::stop`], when the reader notices the
    /// closed source within one serial poll slice (50 ms).
    fn reap_session(&mut self) -> Option<SessionEndReason> {
        let session = self.session.take()?;
        let reason = session.join();
        actor_debug!("Reaped session {}: {}", self.session_sequence, reason);
        Some(reason)
    }

    fn handle_start(&mut self, config: ConnectionConfig) -> Result<(), ActorError> {
        if self.session_state().is_active() {
            return Err(self.unexpected("Start"));
        }
        config.validate()?;

        self.reap_session();

        let session_id = self.next_session_id();
        let observer = Arc::new(
            ChannelObserver::new(self.event_tx.clone())
                .with_completion(self.reader_tx.clone(), session_id),
        );

        actor_info!(
            session_id,
            port = %config.port,
            baud = config.baud.as_u32(),
            "starting session"
        );
        let session = AcquisitionSession::start(
            config,
            Arc::clone(&self.source),
            Arc::clone(&self.registry),
            observer,
        )?;
        self.session = Some(session);
        Ok(())
    }

    fn handle_stop(&mut self) -> Result<(), ActorError> {
        match &self.session {
            Some(session) if session.state().is_active() => {
                session.stop();
                // Completion arrives as ReaderMessage::SessionFinished
                Ok(())
            }
            _ => Err(self.unexpected("Stop")),
        }
    }

    fn handle_toggle(&mut self, config: ConnectionConfig) -> Result<(), ActorError> {
        if self.session_state().button_shows_stop() {
            self.handle_stop()
        } else {
            self.handle_start(config)
        }
    }

    fn handle_clear(&mut self) -> Result<(), ActorError> {
        if !self.session_state().allows_clear() {
            return Err(ActorError::UnexpectedMessage {
                state: format!("{:?}", self.session_state()),
                message: "Clear (stop the session before clearing tags)".into(),
            });
        }
        self.registry.clear();
        self.send_ui_event(SessionEvent::Cleared);
        Ok(())
    }

    fn handle_session_finished(
        &mut self,
        session_id: u32,
        reason: SessionEndReason,
    ) -> Result<(), ActorError> {
        if session_id != self.session_sequence {
            actor_debug!(
                "Ignoring stale SessionFinished (session_id={}, expected={})",
                session_id,
                self.session_sequence
            );
            return Ok(());
        }

        actor_info!(session_id, "session finished: {}", reason);
        self.reap_session();
        Ok(())
    }

    fn stop_active_session(&mut self) {
        if let Some(session) = &self.session {
            if session.state().is_active() {
                session.stop();
            }
        }
    }
}

impl Actor for ReaderActor {
    type Message = ReaderMessage;

    fn name(&self) -> &'static str {
        "ReaderActor"
    }

    async fn handle(&mut self, msg: ReaderMessage) -> Result<(), ActorError> {
        match msg {
            ReaderMessage::Command(cmd) => match cmd {
                ShellCommand::Start { config } => self.handle_start(config),
                ShellCommand::Stop => self.handle_stop(),
                ShellCommand::Toggle { config } => self.handle_toggle(config),
                ShellCommand::Clear => self.handle_clear(),
                ShellCommand::Shutdown => {
                    actor_info!("shutdown requested");
                    self.stop_active_session();
                    // Ends the run loop once queued messages are drained
                    self.reader_tx.close_channel();
                    Ok(())
                }
            },
            ReaderMessage::SessionFinished { session_id, reason } => {
                self.handle_session_finished(session_id, reason)
            }
        }
    }

    async fn shutdown(&mut self) {
        self.stop_active_session();
        self.reap_session();
    }
}

use crate::constants::ACQUISITION_THREAD_NAME;
use crate::observer::SessionObserver;
use crate::registry::DedupRegistry;
use actor_protocol::{ActorError, SessionEndReason, SessionState};
use actor_runtime::{actor_debug, actor_error, actor_info, CancellationToken};
use core_types::{ConnectionConfig, Decoder, LineSource, ReadOutcome};
use decoders::TagDecoder;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Session state readable from any thread; written only through validated
/// transitions.
struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: SessionState) -> Self {
        Self(AtomicU8::new(state.to_u8()))
    }

    fn load(&self) -> SessionState {
        SessionState::from_u8(self.0.load(Ordering::Acquire)).unwrap_or(SessionState::Idle)
    }

    fn transition(&self, next: SessionState) -> Result<SessionState, ActorError> {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                SessionState::from_u8(raw)
                    .filter(|current| current.can_transition_to(next))
                    .map(|_| next.to_u8())
            })
            .map(|raw| SessionState::from_u8(raw).unwrap_or(SessionState::Idle))
            .map_err(|raw| {
                ActorError::InvalidTransition(format!(
                    "{:?} → {:?}",
                    SessionState::from_u8(raw),
                    next
                ))
            })
    }
}

/// One run of the acquire-normalize-dedup loop on a dedicated thread.
///
/// Built fresh per start and discarded after it ends. The session owns the
/// line source for its lifetime; the only foreign call into the source is
/// the `close()` issued by [`stop`](Self::stop).
pub struct AcquisitionSession {
    config: ConnectionConfig,
    state: Arc<StateCell>,
    cancel: CancellationToken,
    source: Arc<dyn LineSource>,
    worker: Option<JoinHandle<SessionEndReason>>,
}

impl AcquisitionSession {
    /// Enter `Connecting` and spawn the background thread, which opens the
    /// source and runs the read loop. Returns immediately; the outcome of
    /// `open` is reported to `observer`.
    pub fn start(
        config: ConnectionConfig,
        source: Arc<dyn LineSource>,
        registry: Arc<DedupRegistry>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self, ActorError> {
        config.validate()?;

        let state = Arc::new(StateCell::new(SessionState::Idle));
        state.transition(SessionState::Connecting)?;
        observer.on_state_changed(SessionState::Connecting);

        let cancel = CancellationToken::new();
        let worker = SessionWorker {
            config: config.clone(),
            source: Arc::clone(&source),
            registry,
            observer,
            cancel: cancel.clone(),
            state: Arc::clone(&state),
        };

        let handle = std::thread::Builder::new()
            .name(ACQUISITION_THREAD_NAME.to_string())
            .spawn(move || worker.run())
            .map_err(|e| {
                ActorError::Other(format!(
                    "Failed to start acquisition thread: {e}. Free system resources and retry."
                ))
            })?;

        Ok(Self {
            config,
            state,
            cancel,
            source,
            worker: Some(handle),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state.load()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Ask the loop to stop and close the source to unblock a read in
    /// progress. Returns false if a stop was already requested.
    pub fn stop(&self) -> bool {
        let first = self.cancel.cancel();
        if first {
            actor_debug!(port = %self.config.port, "stop requested");
        }
        self.source.close();
        first
    }

    /// Wait for the background thread and return why the session ended.
    pub fn join(mut self) -> SessionEndReason {
        match self.worker.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                actor_error!("acquisition thread panicked");
                SessionEndReason::IoError("acquisition thread panicked".into())
            }),
            None => SessionEndReason::UserStop,
        }
    }
}

impl Drop for AcquisitionSession {
    fn drop(&mut self) {
        // No forced kill: the thread notices the stop and exits on its own.
        if self.worker.is_some() {
            self.stop();
        }
    }
}

struct SessionWorker {
    config: ConnectionConfig,
    source: Arc<dyn LineSource>,
    registry: Arc<DedupRegistry>,
    observer: Arc<dyn SessionObserver>,
    cancel: CancellationToken,
    state: Arc<StateCell>,
}

impl SessionWorker {
    fn enter(&self, next: SessionState) {
        match self.state.transition(next) {
            Ok(previous) => {
                actor_debug!("Session: {:?} → {:?}", previous, next);
                self.observer.on_state_changed(next);
            }
            Err(e) => actor_error!("{}", e),
        }
    }

    fn run(self) -> SessionEndReason {
        let target = format!("{} @ {}", self.config.port, self.config.baud);
        self.observer
            .on_status_changed(&format!("Connecting to {target}"));

        if let Err(e) = self.source.open(&self.config) {
            actor_error!(port = %self.config.port, "open failed: {}", e);
            let reason = SessionEndReason::ConnectionError(e.detail());
            self.enter(SessionState::Idle);
            self.observer.on_status_changed(&reason.status_text());
            self.observer.on_session_ended(&reason);
            return reason;
        }

        self.enter(SessionState::Reading);
        actor_info!("Connected to {}", target);
        self.observer
            .on_status_changed(&format!("Connected to {target}"));

        let reason = self.read_loop();

        self.enter(match reason {
            SessionEndReason::UserStop => SessionState::Stopping,
            _ => SessionState::Errored,
        });
        self.source.close();
        self.enter(SessionState::Idle);

        actor_info!(
            port = %self.config.port,
            tags = self.registry.count(),
            "session ended: {}",
            reason
        );
        self.observer.on_status_changed(&reason.status_text());
        self.observer.on_session_ended(&reason);
        reason
    }

    fn read_loop(&self) -> SessionEndReason {
        let mut decoder = TagDecoder::new();

        loop {
            if self.cancel.is_cancelled() {
                return SessionEndReason::UserStop;
            }

            match self.source.read_line(self.config.read_timeout) {
                Ok(ReadOutcome::Timeout) => continue,
                Ok(ReadOutcome::Line(frame)) => {
                    let Some(token) = decoder.ingest(&frame) else {
                        continue;
                    };
                    if let Some(count) = self.registry.insert_if_new(token.clone()) {
                        actor_debug!(tag = %token, count, "tag accepted");
                        self.observer
                            .on_tag_accepted(&token, count, frame.timestamp_us);
                    }
                }
                // A read torn down by stop() is a stop, not a fault.
                Err(_) if self.cancel.is_cancelled() => return SessionEndReason::UserStop,
                Err(e) => {
                    actor_error!(port = %self.config.port, "read failed: {}", e);
                    return SessionEndReason::IoError(e.detail());
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_state_cell_rejects_invalid_transition() {
        let cell = StateCell::new(SessionState::Idle);
        assert!(cell.transition(SessionState::Reading).is_err());
        assert_eq!(cell.load(), SessionState::Idle);

        assert_eq!(cell.transition(SessionState::Connecting), Ok(SessionState::Idle));
        assert_eq!(cell.load(), SessionState::Connecting);
    }

    #[test]
    fn test_state_cell_full_cycle() {
        let cell = StateCell::new(SessionState::Idle);
        for next in [
            SessionState::Connecting,
            SessionState::Reading,
            SessionState::Errored,
            SessionState::Idle,
        ] {
            cell.transition(next).unwrap();
        }
        assert_eq!(cell.load(), SessionState::Idle);
    }
}

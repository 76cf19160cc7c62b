use actor_protocol::{ActorError, SessionEvent};
use futures::stream::StreamExt;
use futures_channel::mpsc;

/// Message-driven component with its own inbox
///
/// Messages are handled one at a time, in arrival order. A failing
/// `handle` does not end the actor; the failure is reported to the shell
/// as [`SessionEvent::Error`] and the next message is processed.
///
/// # Lifecycle
///
/// 1. **init()** once, before the first message
/// 2. **handle()** per message
/// 3. **shutdown()** once the inbox is closed and drained
///
/// # Example
///
/// ```ignore
/// struct TagCounter {
///     seen: usize,
/// }
///
/// impl Actor for TagCounter {
///     type Message = TagToken;
///
///     fn name(&self) -> &'static str {
///         "TagCounter"
///     }
///
///     async fn handle(&mut self, _tag: TagToken) -> Result<(), ActorError> {
///         self.seen += 1;
///         Ok(())
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait Actor: Send + 'static {
    type Message: Send + 'static;

    /// Name used in logs and in error events
    fn name(&self) -> &'static str;

    async fn init(&mut self) -> Result<(), ActorError> {
        Ok(())
    }

    async fn handle(&mut self, msg: Self::Message) -> Result<(), ActorError>;

    /// Stop background work and release resources
    async fn shutdown(&mut self) {}

    /// Drive the actor until the inbox closes
    ///
    /// The inbox closes when every sender is dropped or one of them calls
    /// `close_channel`. Queued messages are still handled before
    /// [`shutdown`](Self::shutdown) runs. An `init` failure ends the actor
    /// without handling anything.
    async fn run(
        mut self,
        mut rx: mpsc::Receiver<Self::Message>,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) where
        Self: Sized,
    {
        let name = self.name();

        if let Err(e) = self.init().await {
            crate::actor_error!(actor = name, "init failed: {}", e);
            let _ = event_tx.unbounded_send(SessionEvent::Error {
                message: format!("{name} init failed: {e}"),
            });
            return;
        }

        crate::actor_debug!(actor = name, "started");

        while let Some(msg) = rx.next().await {
            if let Err(e) = self.handle(msg).await {
                crate::actor_warn!(actor = name, "{}", e);
                let _ = event_tx.unbounded_send(SessionEvent::Error {
                    message: format!("{name} error: {e}"),
                });
            }
        }

        self.shutdown().await;
        crate::actor_debug!(actor = name, "stopped");
    }
}

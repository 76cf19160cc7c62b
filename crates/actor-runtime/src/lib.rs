//! # Actor Runtime
//!
//! Provides the runtime infrastructure for the tag acquisition actor system.
//!
//! This crate defines:
//! - **Actor trait**: Base trait for all actors with lifecycle methods
//! - **Channel management**: Type-safe message routing between shell and actors
//! - **Cancellation**: Cooperative stop signal shared with background threads
//! - **Logging**: `actor_*!` macros over `tracing`
//!
//! ## Threads
//!
//! Actors run as async tasks and never block on serial I/O. Reading happens
//! on a plain thread owned by the acquisition session; it talks back to the
//! actors only through channels and watches a [`CancellationToken`] for
//! stop requests.
//!
//! ## Example
//!
//! ```ignore
//! use actor_runtime::{Actor, ChannelManager};
//!
//! let (manager, handles) = ChannelManager::new();
//! let reader = ReaderActor::new(source, registry, manager.event_sender(), manager.reader_sender());
//! tokio::spawn(async move { reader.run(handles.reader_rx, event_tx).await });
//!
//! manager.send_command(ShellCommand::Start { config })?;
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod actor;
pub mod cancellation;
pub mod channels;
pub mod logging;

pub use actor::Actor;
pub use cancellation::CancellationToken;
pub use channels::{ActorHandles, ChannelManager, ReaderMessage};

#[doc(hidden)]
pub use tracing;

//! # Acquisition
//!
//! Tag acquisition from a line source into a deduplicated registry.
//!
//! ## Components
//!
//! - **DedupRegistry**: Thread-safe set of accepted tags, in arrival order
//! - **AcquisitionSession**: One start-to-stop read loop on a background thread
//! - **SessionObserver**: Callback contract for accepted tags, status and session end
//! - **ReaderActor**: Foreground controller handling shell commands
//!
//! ## Data Flow
//!
//! ```text
//! LineSource ──► TagDecoder ──► DedupRegistry ──► SessionObserver ──► Shell
//!    ▲                                                  │
//!    └──────────── ReaderActor ◄── SessionFinished ─────┘
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod constants;
pub mod observer;
pub mod reader_actor;
pub mod registry;
pub mod session;

pub use observer::{ChannelObserver, SessionObserver};
pub use reader_actor::ReaderActor;
pub use registry::DedupRegistry;
pub use session::AcquisitionSession;

/// Centralized logging macros for the actor system
///
/// Thin wrappers over `tracing` that tag every record with the `actor`
/// target, so `RUST_LOG=actor=debug` isolates actor traffic. Structured
/// fields work as in `tracing` itself.
///
/// Log debug-level message
///
/// # Example
/// ```
/// use actor_runtime::actor_debug;
/// actor_debug!("ReaderActor: {:?} → {:?}", "Idle", "Connecting");
/// ```
#[macro_export]
macro_rules! actor_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "actor", $($arg)*)
    };
}

/// Log info-level message
///
/// Use for important state changes and user-facing events
#[macro_export]
macro_rules! actor_info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "actor", $($arg)*)
    };
}

/// Log warning-level message
///
/// Use for recoverable errors and unexpected conditions
#[macro_export]
macro_rules! actor_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "actor", $($arg)*)
    };
}

/// Log error-level message
///
/// Use for failures that end a session or reject a command
#[macro_export]
macro_rules! actor_error {
    ($($arg:tt)*) => {
        $crate::tracing::error!(target: "actor", $($arg)*)
    };
}

use core_types::{ConnectionConfig, Frame, LineSource, ReadOutcome, TransportError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One scripted response to `read_line`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Line(String),
    Timeout,
    Fail(String),
}

/// In-memory [`LineSource`] replaying a fixed script.
///
/// Once the script is exhausted every read waits `idle_wait` (capped by the
/// caller's timeout) and reports `Timeout`, like a connected reader with no
/// tag in range. Counters record how the source was driven.
pub struct ScriptedLineSource {
    script: Mutex<VecDeque<ScriptStep>>,
    open_error: Mutex<Option<String>>,
    idle_wait: Duration,
    closed: AtomicBool,
    opens: AtomicUsize,
    reads: AtomicUsize,
    close_calls: AtomicUsize,
    closes: AtomicUsize,
}

impl ScriptedLineSource {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            open_error: Mutex::new(None),
            idle_wait: Duration::from_millis(5),
            closed: AtomicBool::new(true),
            opens: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    /// Script the given raw lines, in order.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source = Self::new();
        for line in lines {
            source.push(ScriptStep::Line(line.into()));
        }
        source
    }

    /// Make every `open` fail with the given reason.
    pub fn failing_open(reason: impl Into<String>) -> Self {
        let source = Self::new();
        *lock(&source.open_error) = Some(reason.into());
        source
    }

    pub fn push(&self, step: ScriptStep) {
        lock(&self.script).push_back(step);
    }

    pub fn push_timeouts(&self, count: usize) {
        let mut script = lock(&self.script);
        script.extend(std::iter::repeat(ScriptStep::Timeout).take(count));
    }

    /// Successful or failed `open` attempts.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Acquire)
    }

    /// Calls to `read_line`, including ones rejected because the source was closed.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Acquire)
    }

    /// Calls to `close`, effective or not.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::Acquire)
    }

    /// Calls to `close` that actually closed an open connection.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Acquire)
    }
}

impl Default for ScriptedLineSource {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LineSource for ScriptedLineSource {
    fn open(&self, config: &ConnectionConfig) -> Result<(), TransportError> {
        self.opens.fetch_add(1, Ordering::AcqRel);
        if let Some(reason) = lock(&self.open_error).clone() {
            return Err(TransportError::ConnectionFailed(format!(
                "{}: {}",
                config.port, reason
            )));
        }
        if self
            .closed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(TransportError::ConnectionFailed(format!(
                "{}: already in use",
                config.port
            )));
        }
        Ok(())
    }

    fn read_line(&self, timeout: Duration) -> Result<ReadOutcome, TransportError> {
        let read_index = self.reads.fetch_add(1, Ordering::AcqRel);
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }

        let step = lock(&self.script).pop_front();
        match step {
            Some(ScriptStep::Line(line)) => {
                let timestamp_us = u64::try_from(read_index).unwrap_or(u64::MAX);
                Ok(ReadOutcome::Line(Frame::new(line.into_bytes(), timestamp_us)))
            }
            Some(ScriptStep::Timeout) => Ok(ReadOutcome::Timeout),
            Some(ScriptStep::Fail(reason)) => Err(TransportError::Io(reason)),
            None => {
                std::thread::sleep(self.idle_wait.min(timeout));
                if self.closed.load(Ordering::Acquire) {
                    Err(TransportError::Closed)
                } else {
                    Ok(ReadOutcome::Timeout)
                }
            }
        }
    }

    fn close(&self) -> bool {
        self.close_calls.fetch_add(1, Ordering::AcqRel);
        let first = !self.closed.swap(true, Ordering::AcqRel);
        if first {
            self.closes.fetch_add(1, Ordering::AcqRel);
        }
        first
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use core_types::BaudRate;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("COM5", BaudRate::B9600).unwrap()
    }

    #[test]
    fn test_replays_script_in_order() {
        let source = ScriptedLineSource::with_lines(["A1\n", "B2\n"]);
        source.push(ScriptStep::Timeout);
        source.push(ScriptStep::Fail("unplugged".into()));
        source.open(&config()).unwrap();

        let timeout = Duration::from_millis(10);
        match source.read_line(timeout).unwrap() {
            ReadOutcome::Line(frame) => assert_eq!(frame.bytes, b"A1\n"),
            other => panic!("Expected line, got {:?}", other),
        }
        assert!(matches!(source.read_line(timeout), Ok(ReadOutcome::Line(_))));
        assert_eq!(source.read_line(timeout), Ok(ReadOutcome::Timeout));
        assert_eq!(
            source.read_line(timeout),
            Err(TransportError::Io("unplugged".into()))
        );
        // Exhausted script idles.
        assert_eq!(source.read_line(timeout), Ok(ReadOutcome::Timeout));
        assert_eq!(source.read_count(), 5);
    }

    #[test]
    fn test_close_is_idempotent() {
        let source = ScriptedLineSource::new();
        source.open(&config()).unwrap();
        assert!(source.close());
        assert!(!source.close());
        assert_eq!(source.close_calls(), 2);
        assert_eq!(source.close_count(), 1);
        assert_eq!(
            source.read_line(Duration::from_millis(1)),
            Err(TransportError::Closed)
        );
    }

    #[test]
    fn test_failing_open() {
        let source = ScriptedLineSource::failing_open("Access is denied");
        let err = source.open(&config()).unwrap_err();
        assert!(err.is_connection());
        assert!(err.to_string().contains("Access is denied"));
        assert!(!source.is_open());
    }

    #[test]
    fn test_second_open_reports_in_use() {
        let source = ScriptedLineSource::new();
        source.open(&config()).unwrap();
        assert!(source.open(&config()).unwrap_err().is_connection());
        source.close();
        assert!(source.open(&config()).is_ok());
        assert_eq!(source.open_count(), 3);
    }
}

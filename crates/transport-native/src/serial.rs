use core_types::{ConnectionConfig, Frame, LineSource, ReadOutcome, TransportError};
use framing::{Framer, LineFramer};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

/// Port used when enumeration finds nothing (the reader's factory default).
pub const DEFAULT_PORT: &str = "COM5";

/// Longest a single device read blocks. Bounds how long a foreground
/// `close()` can go unnoticed by the reader.
pub const POLL_SLICE: Duration = Duration::from_millis(50);

const READ_CHUNK: usize = 256;

struct OpenPort {
    port: Box<dyn serialport::SerialPort>,
    framer: LineFramer,
    ready: VecDeque<Frame>,
    opened_at: Instant,
}

/// [`LineSource`] over a native serial port.
pub struct SerialLineSource {
    inner: Mutex<Option<OpenPort>>,
    closed: AtomicBool,
}

impl SerialLineSource {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
            closed: AtomicBool::new(true),
        }
    }

    fn lock_port(&self) -> MutexGuard<'_, Option<OpenPort>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SerialLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for SerialLineSource {
    fn open(&self, config: &ConnectionConfig) -> Result<(), TransportError> {
        let mut guard = self.lock_port();
        if guard.is_some() {
            return Err(TransportError::ConnectionFailed(format!(
                "{} is already open in this session. Stop the current session first.",
                config.port
            )));
        }

        let port = serialport::new(config.port.as_str(), config.baud.as_u32())
            .timeout(POLL_SLICE.min(config.read_timeout))
            .open()
            .map_err(|e| TransportError::ConnectionFailed(format!("{}: {}", config.port, e)))?;

        tracing::info!(port = %config.port, baud = config.baud.as_u32(), "serial port opened");

        *guard = Some(OpenPort {
            port,
            framer: LineFramer::new(),
            ready: VecDeque::new(),
            opened_at: Instant::now(),
        });
        self.closed.store(false, Ordering::Release);
        Ok(())
    }

    fn read_line(&self, timeout: Duration) -> Result<ReadOutcome, TransportError> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock_port();
        let mut buf = [0u8; READ_CHUNK];

        loop {
            if self.closed.load(Ordering::Acquire) {
                // A foreground close() could not take the lock; release the port here.
                guard.take();
                return Err(TransportError::Closed);
            }
            let open = guard.as_mut().ok_or(TransportError::NotConnected)?;

            if let Some(frame) = open.ready.pop_front() {
                return Ok(ReadOutcome::Line(frame));
            }
            if Instant::now() >= deadline {
                return Ok(ReadOutcome::Timeout);
            }

            match open.port.read(&mut buf) {
                Ok(0) => {}
                Ok(n) => {
                    let timestamp_us =
                        u64::try_from(open.opened_at.elapsed().as_micros()).unwrap_or(u64::MAX);
                    let chunk = buf.get(..n).unwrap_or_default();
                    let frames = open.framer.push(chunk, timestamp_us);
                    open.ready.extend(frames);
                }
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => {}
                Err(e) => return Err(TransportError::Io(e.to_string())),
            }
        }
    }

    fn close(&self) -> bool {
        let first = !self.closed.swap(true, Ordering::AcqRel);
        match self.inner.try_lock() {
            Ok(mut guard) => {
                guard.take();
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                poisoned.into_inner().take();
            }
            // Reader holds the port; it drops it within one poll slice.
            Err(TryLockError::WouldBlock) => {}
        }
        if first {
            tracing::info!("serial port closed");
        }
        first
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}

/// Names of the serial devices currently present, in enumeration order.
pub fn available_ports() -> Result<Vec<String>, TransportError> {
    serialport::available_ports()
        .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
        .map_err(|e| TransportError::Io(format!("Failed to enumerate serial ports: {e}")))
}

/// Pick the port a shell should preselect: [`DEFAULT_PORT`] if present,
/// otherwise the first enumerated port, otherwise [`DEFAULT_PORT`].
pub fn preferred_port(ports: &[String]) -> String {
    if ports.iter().any(|p| p == DEFAULT_PORT) {
        return DEFAULT_PORT.to_string();
    }
    ports
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_PORT.to_string())
}

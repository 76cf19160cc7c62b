use acquisition::constants::{DEFAULT_BAUD, DEFAULT_READ_TIMEOUT_MS, IDLE_STATUS};
use acquisition::{DedupRegistry, ReaderActor};
use actor_protocol::{SessionEvent, ShellCommand};
use actor_runtime::{Actor, ChannelManager};
use anyhow::{Context, Result};
use clap::Parser;
use core_types::{BaudRate, ConnectionConfig};
use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use transport_native::{available_ports, preferred_port, SerialLineSource};

/// Read RFID tag serials from a serial reader and print each unique tag once.
#[derive(Debug, Parser)]
#[command(name = "tagscan", version)]
struct Cli {
    /// Serial port of the reader (defaults to COM5 if present, else the first port found).
    #[arg(long, env = "TAGSCAN_PORT", value_name = "PORT")]
    port: Option<String>,

    /// Baud rate: 9600, 19200, 38400 or 115200. Anything else falls back to 9600.
    #[arg(long, env = "TAGSCAN_BAUD")]
    baud: Option<String>,

    /// Per-read timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = DEFAULT_READ_TIMEOUT_MS, value_name = "MS")]
    timeout_ms: u64,

    /// List serial ports and exit.
    #[arg(long = "list-ports", default_value_t = false)]
    list_ports: bool,
}

fn setup_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config(cli: &Cli) -> Result<ConnectionConfig> {
    let port = match &cli.port {
        Some(port) => port.clone(),
        None => {
            let ports = available_ports().unwrap_or_else(|e| {
                tracing::warn!("port enumeration failed: {}", e);
                Vec::new()
            });
            preferred_port(&ports)
        }
    };

    let baud = match cli.baud.as_deref() {
        None => DEFAULT_BAUD,
        Some(text) => {
            let baud = BaudRate::parse_or_default(text);
            if baud.to_string() != text.trim() {
                tracing::warn!(requested = %text, "unsupported baud rate, using {}", baud);
            }
            baud
        }
    };

    ConnectionConfig::with_timeout(port, baud, Duration::from_millis(cli.timeout_ms))
        .context("invalid connection settings")
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    if cli.list_ports {
        for port in available_ports().context("cannot enumerate serial ports")? {
            println!("{port}");
        }
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    eprintln!("Status: {IDLE_STATUS}");

    let (mut manager, handles) = ChannelManager::new();
    let mut events = manager
        .take_event_receiver()
        .context("event receiver already taken")?;

    let registry = Arc::new(DedupRegistry::new());
    let actor = ReaderActor::new(
        Arc::new(SerialLineSource::new()),
        Arc::clone(&registry),
        handles.event_tx.clone(),
        manager.reader_sender(),
    );
    let actor_task = tokio::spawn(async move { actor.run(handles.reader_rx, handles.event_tx).await });

    manager.send_command(ShellCommand::Start { config })?;

    let mut outcome = None;
    let mut shutdown_sent = false;
    while outcome.is_none() {
        tokio::select! {
            signal = tokio::signal::ctrl_c(), if !shutdown_sent => {
                signal.context("cannot listen for Ctrl-C")?;
                manager.send_command(ShellCommand::Shutdown)?;
                shutdown_sent = true;
            }
            event = events.next() => match event {
                Some(SessionEvent::TagAccepted { token, count, .. }) => {
                    println!("{count:>4}  {token}");
                }
                Some(SessionEvent::StatusChanged { message }) => eprintln!("Status: {message}"),
                Some(SessionEvent::Error { message }) => eprintln!("error: {message}"),
                Some(SessionEvent::SessionEnded { reason }) => outcome = Some(reason),
                Some(_) => {}
                None => break,
            },
        }
    }

    if !shutdown_sent {
        manager.send_command(ShellCommand::Shutdown)?;
    }
    actor_task.await.context("reader actor panicked")?;

    eprintln!("{} unique tag(s)", registry.count());
    match outcome {
        Some(reason) if reason.is_failure() => Err(anyhow::anyhow!(reason.status_text())),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use acquisition::constants::DEFAULT_READ_TIMEOUT;

    #[test]
    fn test_timeout_flag_defaults_to_read_timeout() {
        let cli = Cli::try_parse_from(["tagscan", "--port", "COM7"]).unwrap();
        assert_eq!(cli.timeout_ms, DEFAULT_READ_TIMEOUT_MS);

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.port, "COM7");
        assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn test_unsupported_baud_falls_back() {
        let cli = Cli::try_parse_from(["tagscan", "--port", "COM7", "--baud", "57600"]).unwrap();
        assert_eq!(resolve_config(&cli).unwrap().baud, BaudRate::B9600);

        let cli = Cli::try_parse_from(["tagscan", "--port", "COM7", "--baud", "38400"]).unwrap();
        assert_eq!(resolve_config(&cli).unwrap().baud, BaudRate::B38400);
    }
}

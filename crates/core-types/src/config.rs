use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No serial port selected. Choose a port (e.g. COM5 or /dev/ttyUSB0) and retry.")]
    MissingPort,
    #[error("Unsupported baud rate '{0}': expected one of 9600, 19200, 38400, 115200")]
    UnsupportedBaud(String),
    #[error("Read timeout must be greater than zero")]
    ZeroTimeout,
}

/// Line signalling rates offered by the reader hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaudRate {
    #[default]
    B9600,
    B19200,
    B38400,
    B115200,
}

impl BaudRate {
    pub const ALL: [BaudRate; 4] = [
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
        BaudRate::B115200,
    ];

    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B115200 => 115200,
        }
    }

    /// Parse user text, falling back to 9600 on anything unrecognised.
    pub fn parse_or_default(text: &str) -> Self {
        text.parse().unwrap_or_default()
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|baud| baud.as_u32() == value)
            .ok_or_else(|| ConfigError::UnsupportedBaud(value.to_string()))
    }
}

impl FromStr for BaudRate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: u32 = trimmed
            .parse()
            .map_err(|_| ConfigError::UnsupportedBaud(trimmed.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Parameters of one acquisition session. A new session is needed to change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub port: String,
    pub baud: BaudRate,
    pub read_timeout: Duration,
}

impl ConnectionConfig {
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn new(port: impl Into<String>, baud: BaudRate) -> Result<Self, ConfigError> {
        Self::with_timeout(port, baud, Self::DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeout(
        port: impl Into<String>,
        baud: BaudRate,
        read_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            port: port.into().trim().to_string(),
            baud,
            read_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants again, e.g. after deserialising a config from the shell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.trim().is_empty() {
            return Err(ConfigError::MissingPort);
        }
        if self.read_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baud_is_9600() {
        assert_eq!(BaudRate::default().as_u32(), 9600);
    }

    #[test]
    fn test_baud_parsing() {
        assert_eq!("115200".parse::<BaudRate>().unwrap(), BaudRate::B115200);
        assert_eq!(" 19200 ".parse::<BaudRate>().unwrap(), BaudRate::B19200);
        assert!(matches!(
            "57600".parse::<BaudRate>(),
            Err(ConfigError::UnsupportedBaud(_))
        ));
        assert_eq!(BaudRate::parse_or_default("fast"), BaudRate::B9600);
        assert_eq!(BaudRate::try_from(38400).unwrap(), BaudRate::B38400);
    }

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::new("COM5", BaudRate::default()).unwrap();
        assert_eq!(config.port, "COM5");
        assert_eq!(config.read_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_config_rejects_empty_port() {
        assert_eq!(
            ConnectionConfig::new("   ", BaudRate::B9600),
            Err(ConfigError::MissingPort)
        );
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        assert_eq!(
            ConnectionConfig::with_timeout("COM5", BaudRate::B9600, Duration::ZERO),
            Err(ConfigError::ZeroTimeout)
        );
    }
}

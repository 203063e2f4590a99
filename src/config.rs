//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset or unparseable tuning knobs fall
//! back to their defaults; the listen address, the keepalive pair, the write
//! deadline and the history page sizes are validated strictly.

use std::net::SocketAddr;
use std::time::Duration;

/// Errors raised while loading [`ChatConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configured listen address is not a valid socket address.
    #[error("invalid listen address {value:?}: {source}")]
    InvalidListenAddr {
        /// Raw value that failed to parse.
        value: String,
        /// Underlying parse error.
        source: std::net::AddrParseError,
    },

    /// The keepalive probe would fire after the read deadline lapses.
    #[error("ping interval ({ping_secs}s) must be shorter than pong wait ({pong_secs}s)")]
    KeepaliveOrder {
        /// Configured ping interval in seconds.
        ping_secs: u64,
        /// Configured pong wait in seconds.
        pong_secs: u64,
    },

    /// A write deadline of zero would fail every frame.
    #[error("write wait must be at least one second")]
    ZeroWriteWait,

    /// The default history page size is zero or exceeds the maximum.
    #[error("history default limit ({default_limit}) must be between 1 and the max limit ({max_limit})")]
    HistoryLimits {
        /// Configured default page size.
        default_limit: usize,
        /// Configured maximum page size.
        max_limit: usize,
    },
}

/// Log output format selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`ChatConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Capacity of each connection's outbound queue.
    pub outbound_queue_capacity: usize,

    /// Capacity of the hub request channel.
    pub hub_command_capacity: usize,

    /// Seconds between keepalive pings sent by the writer path.
    pub ping_interval_secs: u64,

    /// Seconds the reader path waits for any inbound activity.
    pub pong_wait_secs: u64,

    /// Seconds allowed for writing a single frame.
    pub write_wait_secs: u64,

    /// Largest inbound WebSocket message accepted, in bytes.
    pub max_message_bytes: usize,

    /// History page size used when the request does not give one.
    pub history_default_limit: usize,

    /// Upper bound on the history page size.
    pub history_max_limit: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            outbound_queue_capacity: 256,
            hub_command_capacity: 256,
            ping_interval_secs: 54,
            pong_wait_secs: 60,
            write_wait_secs: 10,
            max_message_bytes: 64 * 1024,
            history_default_limit: 50,
            history_max_limit: 100,
            log_format: LogFormat::Text,
        }
    }
}

impl ChatConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    /// `LISTEN_ADDR` wins over `HOST`/`PORT` when both are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidListenAddr`] if the listen address cannot
    /// be parsed, or any error reported by [`ChatConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let raw_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| {
            let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
            let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
            format!("{host}:{port}")
        });
        let listen_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidListenAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let config = Self {
            listen_addr,
            outbound_queue_capacity: parse_env(
                "OUTBOUND_QUEUE_CAPACITY",
                defaults.outbound_queue_capacity,
            )
            .max(1),
            hub_command_capacity: parse_env("HUB_COMMAND_CAPACITY", defaults.hub_command_capacity)
                .max(1),
            ping_interval_secs: parse_env("WS_PING_INTERVAL_SECS", defaults.ping_interval_secs),
            pong_wait_secs: parse_env("WS_PONG_WAIT_SECS", defaults.pong_wait_secs),
            write_wait_secs: parse_env("WS_WRITE_WAIT_SECS", defaults.write_wait_secs),
            max_message_bytes: parse_env("WS_MAX_MESSAGE_BYTES", defaults.max_message_bytes),
            history_default_limit: parse_env(
                "HISTORY_DEFAULT_LIMIT",
                defaults.history_default_limit,
            ),
            history_max_limit: parse_env("HISTORY_MAX_LIMIT", defaults.history_max_limit),
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeepaliveOrder`] if the ping interval is not
    /// strictly shorter than the pong wait, [`ConfigError::ZeroWriteWait`]
    /// for a zero write deadline, and [`ConfigError::HistoryLimits`] if the
    /// default page size is zero or above the maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ping_interval_secs == 0 || self.ping_interval_secs >= self.pong_wait_secs {
            return Err(ConfigError::KeepaliveOrder {
                ping_secs: self.ping_interval_secs,
                pong_secs: self.pong_wait_secs,
            });
        }
        if self.write_wait_secs == 0 {
            return Err(ConfigError::ZeroWriteWait);
        }
        if self.history_default_limit == 0 || self.history_default_limit > self.history_max_limit {
            return Err(ConfigError::HistoryLimits {
                default_limit: self.history_default_limit,
                max_limit: self.history_max_limit,
            });
        }
        Ok(())
    }

    /// Keepalive probe period.
    #[must_use]
    pub const fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    /// Read deadline window.
    #[must_use]
    pub const fn pong_wait(&self) -> Duration {
        Duration::from_secs(self.pong_wait_secs)
    }

    /// Per-frame write timeout.
    #[must_use]
    pub const fn write_wait(&self) -> Duration {
        Duration::from_secs(self.write_wait_secs)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let config = ChatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.outbound_queue_capacity, 256);
        assert!(config.ping_interval() < config.pong_wait());
    }

    #[test]
    fn ping_not_shorter_than_pong_is_rejected() {
        let config = ChatConfig {
            ping_interval_secs: 60,
            pong_wait_secs: 60,
            ..ChatConfig::default()
        };
        let Err(ConfigError::KeepaliveOrder { ping_secs, pong_secs }) = config.validate() else {
            panic!("expected keepalive order error");
        };
        assert_eq!((ping_secs, pong_secs), (60, 60));
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: usize = parse_env("CHAT_HUB_TEST_SURELY_UNSET_KEY", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn zero_write_wait_is_rejected() {
        let config = ChatConfig {
            write_wait_secs: 0,
            ..ChatConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWriteWait)));
    }

    #[test]
    fn history_default_must_fit_under_max() {
        let zero = ChatConfig {
            history_default_limit: 0,
            ..ChatConfig::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::HistoryLimits {
                default_limit: 0,
                ..
            })
        ));

        let above_max = ChatConfig {
            history_default_limit: 150,
            history_max_limit: 100,
            ..ChatConfig::default()
        };
        let Err(ConfigError::HistoryLimits {
            default_limit,
            max_limit,
        }) = above_max.validate()
        else {
            panic!("expected history limits error");
        };
        assert_eq!((default_limit, max_limit), (150, 100));

        let equal = ChatConfig {
            history_default_limit: 100,
            history_max_limit: 100,
            ..ChatConfig::default()
        };
        assert!(equal.validate().is_ok());
    }
}

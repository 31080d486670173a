//! Datasource configuration.

use std::time::Duration;

use rulesync_constants::datasource::DEFAULT_LISTEN_INTERVAL_MS;
use rulesync_constants::datasource::DEFAULT_SESSION_WAIT_TIMEOUT_MS;
use rulesync_constants::datasource::DEFAULT_TRANSPORT_PORT;
use rulesync_constants::datasource::DEFAULT_TRANSPORT_TIMEOUT_MS;
use rulesync_constants::datasource::MAX_SESSION_WAIT_TIMEOUT_MS;
use rulesync_constants::datasource::MAX_TRANSPORT_TIMEOUT_MS;
use serde::Deserialize;
use serde::Serialize;

use crate::error::SyncError;

/// Settings for the config-push session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceConfig {
    /// Per-request timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Long-poll interval.
    #[serde(default = "default_listen_interval_ms")]
    pub listen_interval_ms: u64,

    /// Port appended to the transport host.
    #[serde(default = "default_transport_port")]
    pub transport_port: u16,

    /// Upper bound on waiting for the session token.
    #[serde(default = "default_session_wait_timeout_ms")]
    pub session_wait_timeout_ms: u64,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            listen_interval_ms: default_listen_interval_ms(),
            transport_port: default_transport_port(),
            session_wait_timeout_ms: default_session_wait_timeout_ms(),
        }
    }
}

impl DatasourceConfig {
    pub fn session_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.session_wait_timeout_ms)
    }

    /// `host:port` of the config-push service.
    pub fn transport_endpoint(&self, host: &str) -> String {
        format!("{}:{}", host, self.transport_port)
    }

    /// Overlay non-default fields from `other`.
    pub fn merge(&mut self, other: Self) {
        if other.timeout_ms != default_timeout_ms() {
            self.timeout_ms = other.timeout_ms;
        }
        if other.listen_interval_ms != default_listen_interval_ms() {
            self.listen_interval_ms = other.listen_interval_ms;
        }
        if other.transport_port != default_transport_port() {
            self.transport_port = other.transport_port;
        }
        if other.session_wait_timeout_ms != default_session_wait_timeout_ms() {
            self.session_wait_timeout_ms = other.session_wait_timeout_ms;
        }
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.timeout_ms == 0 {
            return Err(SyncError::Config {
                message: "timeout_ms must be non-zero".into(),
            });
        }

        if self.timeout_ms > MAX_TRANSPORT_TIMEOUT_MS {
            return Err(SyncError::Config {
                message: format!("timeout_ms must not exceed {MAX_TRANSPORT_TIMEOUT_MS}"),
            });
        }

        if self.listen_interval_ms == 0 {
            return Err(SyncError::Config {
                message: "listen_interval_ms must be non-zero".into(),
            });
        }

        if self.transport_port == 0 {
            return Err(SyncError::Config {
                message: "transport_port must be non-zero".into(),
            });
        }

        if self.session_wait_timeout_ms == 0 {
            return Err(SyncError::Config {
                message: "session_wait_timeout_ms must be non-zero".into(),
            });
        }

        if self.session_wait_timeout_ms > MAX_SESSION_WAIT_TIMEOUT_MS {
            return Err(SyncError::Config {
                message: format!("session_wait_timeout_ms must not exceed {MAX_SESSION_WAIT_TIMEOUT_MS}"),
            });
        }

        Ok(())
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TRANSPORT_TIMEOUT_MS
}

fn default_listen_interval_ms() -> u64 {
    DEFAULT_LISTEN_INTERVAL_MS
}

fn default_transport_port() -> u16 {
    DEFAULT_TRANSPORT_PORT
}

fn default_session_wait_timeout_ms() -> u64 {
    DEFAULT_SESSION_WAIT_TIMEOUT_MS
}

use std::path::PathBuf;

use rulesync_datasource::SyncError;
use rulesync_meta::MetaError;
use snafu::Snafu;

/// Agent start-up errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AgentError {
    #[snafu(display("invalid agent configuration: {source}"))]
    Config { source: ConfigError },

    #[snafu(display("failed to bootstrap process identity: {source}"))]
    Bootstrap { source: MetaError },

    #[snafu(display("failed to start rule synchronization: {source}"))]
    Sync { source: SyncError },
}

/// Configuration loading and parsing errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    #[snafu(display("failed to read config file {}: {source}", path.display()))]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("failed to parse TOML config file {}: {source}", path.display()))]
    ParseToml { path: PathBuf, source: toml::de::Error },

    #[snafu(display("configuration validation failed: {message}"))]
    Validation { message: String },
}

pub type Result<T, E = AgentError> = std::result::Result<T, E>;

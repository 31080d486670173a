//! Error types for identity bootstrap and the readiness gate.

use snafu::Snafu;

use crate::discovery::DiscoveryError;
use crate::host::HostProbeError;

/// Result type for metadata operations.
pub type Result<T, E = MetaError> = std::result::Result<T, E>;

/// Errors raised while bootstrapping or waiting for a session.
///
/// Every variant except [`MetaError::SessionAlreadyDelivered`] is fatal to
/// agent start-up.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MetaError {
    /// No license was configured and the discovery service could not supply one.
    #[snafu(display("cannot find a tenant license: {}", source))]
    DiscoveryUnavailable { source: DiscoveryError },

    /// No active, non-loopback interface carries a usable IPv4 address.
    #[snafu(display("cannot resolve a routeable IPv4 address"))]
    NoRouteableAddress,

    /// The host's interfaces could not be listed.
    #[snafu(display("failed to enumerate network interfaces: {}", source))]
    InterfaceEnumeration { source: HostProbeError },

    /// The endpoint table has no usable entry for this environment and region.
    #[snafu(display("no available endpoint, env not supported: {}", key))]
    UnsupportedEnvironment { key: String },

    /// No session token was delivered within the wait bound.
    #[snafu(display("timed out after {}ms waiting for the transport session", timeout_ms))]
    SessionTimeout { timeout_ms: u64 },

    /// A session token has already been delivered for this process.
    #[snafu(display("session token already delivered"))]
    SessionAlreadyDelivered,
}

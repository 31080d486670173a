//! Error types for the synchronization core.
//!
//! These are start-up failures. Errors inside change listeners are logged and
//! never surface here.

use rulesync_meta::MetaError;
use snafu::Snafu;

use crate::transport::TransportError;

/// Result type for synchronization operations.
pub type Result<T, E = SyncError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SyncError {
    /// The transport never delivered a session token.
    #[snafu(display("transport session not ready: {}", source))]
    Readiness { source: MetaError },

    #[snafu(display("failed to create config session: {}", source))]
    SessionCreate { source: TransportError },

    /// Registration of one subscription failed. Earlier subscriptions stay active.
    #[snafu(display("failed to subscribe to {}: {}", data_id, source))]
    Subscribe { data_id: String, source: TransportError },

    #[snafu(display("invalid datasource configuration: {}", message))]
    Config { message: String },
}

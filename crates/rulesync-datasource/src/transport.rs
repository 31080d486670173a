//! Config-push transport interfaces.
//!
//! The transport is a long-poll configuration service: a session is opened
//! for one namespace and documents are watched by `(group, data-id)`. Each
//! time a watched document changes the transport calls the registered
//! [`ChangeListener`] with the full new payload.

use std::sync::Arc;

use async_trait::async_trait;
use snafu::Snafu;

/// Parameters for opening a transport session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Session token delivered by the transport's auth layer.
    pub namespace_id: String,
    /// `host:port` of the config-push service.
    pub endpoint: String,
    pub timeout_ms: u64,
    pub listen_interval_ms: u64,
}

/// Failure reported by a transport implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    /// The service could not be reached.
    #[snafu(display("config service unavailable at {}: {}", endpoint, source))]
    Unavailable { endpoint: String, source: std::io::Error },

    /// The service refused the request.
    #[snafu(display("config service rejected the request: {}", reason))]
    Rejected { reason: String },
}

/// Receives document changes for one subscription.
#[async_trait]
pub trait ChangeListener: Send + Sync {
    async fn on_change(&self, group: &str, data_id: &str, payload: &str);
}

#[async_trait]
impl<T: ChangeListener + ?Sized> ChangeListener for Arc<T> {
    async fn on_change(&self, group: &str, data_id: &str, payload: &str) {
        (**self).on_change(group, data_id, payload).await
    }
}

/// An open session scoped to one namespace.
#[async_trait]
pub trait ConfigSession: Send + Sync {
    /// Watch a document. The listener is invoked for every published version.
    async fn subscribe(&self, group: &str, data_id: &str, listener: Arc<dyn ChangeListener>)
    -> Result<(), TransportError>;
}

#[async_trait]
impl<T: ConfigSession + ?Sized> ConfigSession for Arc<T> {
    async fn subscribe(
        &self,
        group: &str,
        data_id: &str,
        listener: Arc<dyn ChangeListener>,
    ) -> Result<(), TransportError> {
        (**self).subscribe(group, data_id, listener).await
    }
}

/// Factory for transport sessions.
#[async_trait]
pub trait ConfigTransport: Send + Sync {
    async fn create_session(&self, config: SessionConfig) -> Result<Arc<dyn ConfigSession>, TransportError>;
}

#[async_trait]
impl<T: ConfigTransport + ?Sized> ConfigTransport for Arc<T> {
    async fn create_session(&self, config: SessionConfig) -> Result<Arc<dyn ConfigSession>, TransportError> {
        (**self).create_session(config).await
    }
}

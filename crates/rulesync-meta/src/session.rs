//! Session token delivery and the readiness gate.
//!
//! The transport layer authenticates asynchronously and hands back a session
//! token that namespaces every config subscription. Synchronization must not
//! start before that token exists. [`SessionTokenPromise`] is the one-shot,
//! many-reader slot the token is published through.

use std::time::Duration;

use snafu::OptionExt;
use snafu::ensure;
use tokio::sync::watch;
use tracing::debug;
use tracing::info;

use crate::error::Result;
use crate::error::SessionAlreadyDeliveredSnafu;
use crate::error::SessionTimeoutSnafu;
use crate::identity::ProcessIdentity;

/// One-shot session token slot with any number of waiters.
#[derive(Debug)]
pub struct SessionTokenPromise {
    slot: watch::Sender<Option<String>>,
}

impl Default for SessionTokenPromise {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTokenPromise {
    /// Create an empty promise.
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Publish the token and wake every waiter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MetaError::SessionAlreadyDelivered`] if a token was
    /// already published. The first token stays in place.
    pub fn deliver(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        let delivered = self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(token);
            true
        });
        ensure!(delivered, SessionAlreadyDeliveredSnafu);
        debug!("session token delivered");
        Ok(())
    }

    /// The token, if it has been delivered.
    pub fn token(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn is_delivered(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Wait up to `timeout` for the token.
    ///
    /// An already-delivered token is returned even when `timeout` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MetaError::SessionTimeout`] if nothing is delivered in time.
    pub async fn wait(&self, timeout: Duration) -> Result<String> {
        if let Some(token) = self.token() {
            return Ok(token);
        }

        let mut rx = self.slot.subscribe();
        let token = match tokio::time::timeout(timeout, rx.wait_for(Option::is_some)).await {
            Ok(Ok(slot)) => slot.clone(),
            _ => None,
        };
        token.context(SessionTimeoutSnafu {
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

/// Block until the identity's session token is delivered or `timeout` elapses.
///
/// # Errors
///
/// Returns [`crate::MetaError::SessionTimeout`] on timeout.
pub async fn await_session(identity: &ProcessIdentity, timeout: Duration) -> Result<String> {
    debug!(timeout_ms = timeout.as_millis() as u64, "waiting for transport session");
    let token = identity.session().wait(timeout).await?;
    info!(instance_id = %identity.instance_id(), "transport session established");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;
    use crate::error::MetaError;

    #[tokio::test]
    async fn test_deliver_then_wait() {
        let promise = SessionTokenPromise::new();
        assert!(!promise.is_delivered());
        promise.deliver("tok-1").unwrap();
        assert_eq!(promise.wait(Duration::from_secs(1)).await.unwrap(), "tok-1");
        assert_eq!(promise.token().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_second_delivery_is_rejected() {
        let promise = SessionTokenPromise::new();
        promise.deliver("first").unwrap();
        let err = promise.deliver("second").unwrap_err();
        assert!(matches!(err, MetaError::SessionAlreadyDelivered));
        assert_eq!(promise.token().as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_zero_timeout_returns_delivered_token() {
        let promise = SessionTokenPromise::new();
        promise.deliver("ready").unwrap();
        assert_eq!(promise.wait(Duration::ZERO).await.unwrap(), "ready");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_after_bound_and_not_before() {
        let promise = SessionTokenPromise::new();
        let start = Instant::now();
        let err = promise.wait(Duration::from_secs(30)).await.unwrap_err();
        assert!(matches!(err, MetaError::SessionTimeout { timeout_ms: 30_000 }));
        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_wake_on_late_delivery() {
        let promise = Arc::new(SessionTokenPromise::new());

        let mut waiters = Vec::new();
        for _ in 0..3 {
            let promise = promise.clone();
            waiters.push(tokio::spawn(async move { promise.wait(Duration::from_secs(10)).await }));
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        promise.deliver("late").unwrap();

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap().unwrap(), "late");
        }
    }
}

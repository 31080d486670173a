//! In-memory config-push transport.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rulesync_datasource::ChangeListener;
use rulesync_datasource::ConfigSession;
use rulesync_datasource::ConfigTransport;
use rulesync_datasource::SessionConfig;
use rulesync_datasource::TransportError;

struct Watch {
    group: String,
    data_id: String,
    listener: Arc<dyn ChangeListener>,
}

/// Session that keeps listeners in memory and delivers on [`publish`](Self::publish).
#[derive(Default)]
pub struct InMemoryConfigSession {
    watches: Mutex<Vec<Watch>>,
    failing: Mutex<HashSet<String>>,
}

impl std::fmt::Debug for InMemoryConfigSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConfigSession").field("data_ids", &self.subscribed_data_ids()).finish()
    }
}

impl InMemoryConfigSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make subscriptions to `data_id` fail.
    pub fn fail_subscription(&self, data_id: impl Into<String>) {
        self.failing.lock().insert(data_id.into());
    }

    /// Data-ids with a registered listener, in registration order.
    pub fn subscribed_data_ids(&self) -> Vec<String> {
        self.watches.lock().iter().map(|watch| watch.data_id.clone()).collect()
    }

    /// Deliver a payload to every listener on `data_id`. Returns how many were notified.
    pub async fn publish(&self, data_id: &str, payload: &str) -> usize {
        let targets: Vec<(String, Arc<dyn ChangeListener>)> = self
            .watches
            .lock()
            .iter()
            .filter(|watch| watch.data_id == data_id)
            .map(|watch| (watch.group.clone(), watch.listener.clone()))
            .collect();
        for (group, listener) in &targets {
            listener.on_change(group, data_id, payload).await;
        }
        targets.len()
    }
}

#[async_trait]
impl ConfigSession for InMemoryConfigSession {
    async fn subscribe(
        &self,
        group: &str,
        data_id: &str,
        listener: Arc<dyn ChangeListener>,
    ) -> Result<(), TransportError> {
        if self.failing.lock().contains(data_id) {
            return Err(TransportError::Rejected {
                reason: format!("subscription to {data_id} refused"),
            });
        }
        self.watches.lock().push(Watch {
            group: group.to_string(),
            data_id: data_id.to_string(),
            listener,
        });
        Ok(())
    }
}

/// Transport that hands out one shared [`InMemoryConfigSession`].
#[derive(Debug, Default)]
pub struct InMemoryConfigTransport {
    session: Arc<InMemoryConfigSession>,
    created: Mutex<Vec<SessionConfig>>,
    create_failure: Mutex<Option<TransportError>>,
}

impl InMemoryConfigTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn session(&self) -> Arc<InMemoryConfigSession> {
        self.session.clone()
    }

    /// Configurations passed to `create_session`, in call order.
    pub fn created_sessions(&self) -> Vec<SessionConfig> {
        self.created.lock().clone()
    }

    /// Make the next `create_session` call fail with `error`.
    pub fn fail_session_creation(&self, error: TransportError) {
        *self.create_failure.lock() = Some(error);
    }

    pub async fn publish(&self, data_id: &str, payload: &str) -> usize {
        self.session.publish(data_id, payload).await
    }
}

#[async_trait]
impl ConfigTransport for InMemoryConfigTransport {
    async fn create_session(&self, config: SessionConfig) -> Result<Arc<dyn ConfigSession>, TransportError> {
        if let Some(error) = self.create_failure.lock().take() {
            return Err(error);
        }
        self.created.lock().push(config);
        Ok(self.session.clone())
    }
}

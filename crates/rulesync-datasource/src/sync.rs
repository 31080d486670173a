//! Synchronization start-up.
//!
//! Waits for the transport session, opens a config session scoped to the
//! session token, and subscribes one listener per rule category. From then on
//! the transport drives the listeners; nothing here runs in the background.

use std::sync::Arc;

use rulesync_constants::CONFIG_GROUP_ID;
use rulesync_meta::ProcessIdentity;
use rulesync_meta::await_session;
use rulesync_rules::RuleCategory;
use snafu::ResultExt;
use tracing::debug;
use tracing::info;

use crate::config::DatasourceConfig;
use crate::data_id::data_id;
use crate::engine::RuleEngine;
use crate::error::ReadinessSnafu;
use crate::error::Result;
use crate::error::SessionCreateSnafu;
use crate::error::SubscribeSnafu;
use crate::listener::RuleChangeListener;
use crate::transport::ConfigSession;
use crate::transport::ConfigTransport;
use crate::transport::SessionConfig;

/// One registered document watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub category: RuleCategory,
    pub group: String,
    pub data_id: String,
}

/// Live synchronization state.
///
/// Holds the session open; subscriptions last as long as the transport keeps
/// the session.
pub struct SyncHandle {
    session: Arc<dyn ConfigSession>,
    session_config: SessionConfig,
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for SyncHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncHandle")
            .field("session_config", &self.session_config)
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}

impl SyncHandle {
    pub fn session(&self) -> &Arc<dyn ConfigSession> {
        &self.session
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    /// Subscriptions in registration order.
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn data_id(&self, category: RuleCategory) -> Option<&str> {
        self.subscriptions
            .iter()
            .find(|sub| sub.category == category)
            .map(|sub| sub.data_id.as_str())
    }
}

/// Start rule synchronization.
///
/// Subscribes in the order flow, system, circuit breaking, hot-spot. A failed
/// subscription aborts start-up; subscriptions registered before it are not
/// withdrawn.
///
/// # Errors
///
/// - [`crate::SyncError::Config`] if `config` is invalid.
/// - [`crate::SyncError::Readiness`] if no session token arrives within the configured wait.
/// - [`crate::SyncError::SessionCreate`] or [`crate::SyncError::Subscribe`] on transport failure.
pub async fn start_sync<T>(
    transport: &T,
    transport_host: &str,
    config: &DatasourceConfig,
    identity: &ProcessIdentity,
    engine: Arc<dyn RuleEngine>,
    app_name: &str,
) -> Result<SyncHandle>
where
    T: ConfigTransport + ?Sized,
{
    config.validate()?;

    let token = await_session(identity, config.session_wait_timeout()).await.context(ReadinessSnafu)?;

    let session_config = SessionConfig {
        namespace_id: token,
        endpoint: config.transport_endpoint(transport_host),
        timeout_ms: config.timeout_ms,
        listen_interval_ms: config.listen_interval_ms,
    };
    let session = transport.create_session(session_config.clone()).await.context(SessionCreateSnafu)?;
    debug!(endpoint = %session_config.endpoint, "config session created");

    let tenant_id = identity.tenant_id();
    let mut subscriptions = Vec::with_capacity(RuleCategory::ALL.len());
    for category in RuleCategory::ALL {
        let id = data_id(category, &tenant_id, identity.namespace(), app_name);
        let listener = Arc::new(RuleChangeListener::new(category, engine.clone()));
        session.subscribe(CONFIG_GROUP_ID, &id, listener).await.context(SubscribeSnafu { data_id: id.clone() })?;
        debug!(category = %category, data_id = %id, "subscribed");
        subscriptions.push(Subscription {
            category,
            group: CONFIG_GROUP_ID.to_string(),
            data_id: id,
        });
    }

    let handle = SyncHandle {
        session,
        session_config,
        subscriptions,
    };
    info!(
        flow_data_id = handle.data_id(RuleCategory::Flow).unwrap_or_default(),
        "rule datasource initialized"
    );
    Ok(handle)
}

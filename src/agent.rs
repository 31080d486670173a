//! Agent start-up.
//!
//! Start-up runs in two steps so the embedding process can hand the resolved
//! identity to its transport before synchronization waits on the session
//! token:
//!
//! ```text
//! RuleSyncAgent::bootstrap -> (transport authenticates, delivers token) -> RuleSyncAgent::start
//! ```

use std::sync::Arc;

use rulesync_datasource::ConfigTransport;
use rulesync_datasource::RuleEngine;
use rulesync_datasource::SyncHandle;
use rulesync_datasource::start_sync;
use rulesync_meta::HostProbe;
use rulesync_meta::NetworkMetadataProvider;
use rulesync_meta::ProcessIdentity;
use rulesync_meta::bootstrap;
use snafu::ResultExt;
use tracing::info;

use crate::config::AgentConfig;
use crate::error::BootstrapSnafu;
use crate::error::ConfigSnafu;
use crate::error::Result;
use crate::error::SyncSnafu;

/// A running rule synchronization.
#[derive(Debug)]
pub struct RuleSyncAgent {
    config: AgentConfig,
    identity: Arc<ProcessIdentity>,
    sync: SyncHandle,
}

impl RuleSyncAgent {
    /// Validate `config` and resolve the process identity.
    ///
    /// # Errors
    ///
    /// - [`crate::AgentError::Config`] if `config` is invalid.
    /// - [`crate::AgentError::Bootstrap`] if discovery or local address resolution fails, or the
    ///   environment has no endpoint.
    pub async fn bootstrap<D, H>(config: &AgentConfig, discovery: &D, host: &H) -> Result<Arc<ProcessIdentity>>
    where
        D: NetworkMetadataProvider + ?Sized,
        H: HostProbe + ?Sized,
    {
        config.validate().context(ConfigSnafu)?;
        let identity = bootstrap(&config.bootstrap_request(), discovery, host, &config.endpoint_table())
            .await
            .context(BootstrapSnafu)?;
        Ok(Arc::new(identity))
    }

    /// Subscribe to this application's rule documents over `transport`.
    ///
    /// Waits up to the configured session wait for the transport to deliver
    /// the session token to `identity`.
    ///
    /// # Errors
    ///
    /// - [`crate::AgentError::Config`] if `config` is invalid.
    /// - [`crate::AgentError::Sync`] on session timeout or transport failure.
    pub async fn start<T>(
        config: AgentConfig,
        identity: Arc<ProcessIdentity>,
        transport: &T,
        engine: Arc<dyn RuleEngine>,
    ) -> Result<Self>
    where
        T: ConfigTransport + ?Sized,
    {
        config.validate().context(ConfigSnafu)?;
        let sync = start_sync(
            transport,
            identity.endpoint(),
            &config.datasource,
            &identity,
            engine,
            &config.app_name,
        )
        .await
        .context(SyncSnafu)?;

        info!(
            app_name = %config.app_name,
            namespace = %config.namespace,
            endpoint = %sync.session_config().endpoint,
            "rule sync agent started"
        );
        Ok(Self { config, identity, sync })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn identity(&self) -> &Arc<ProcessIdentity> {
        &self.identity
    }

    pub fn sync(&self) -> &SyncHandle {
        &self.sync
    }
}

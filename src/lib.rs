//! rulesync: keeps an application's flow-control rules in sync with the rule console.
//!
//! The agent resolves who this process is (tenant, network placement,
//! transport endpoint), waits for the transport to authenticate, then
//! subscribes to four rule documents. Each published document is translated
//! from the console's legacy schema and replaces the matching rule set in the
//! embedding process's rule engine.
//!
//! # Crates
//!
//! - [`rulesync_meta`]: identity bootstrap, endpoint table, session readiness
//! - [`rulesync_rules`]: legacy-to-canonical rule translation
//! - [`rulesync_datasource`]: config-push subscriptions and change listeners
//!
//! # Start-up
//!
//! ```ignore
//! let config = AgentConfig::load(Some(Path::new("rulesync.toml")), None)?;
//! let identity = RuleSyncAgent::bootstrap(&config, &discovery, &SystemHostProbe).await?;
//! transport.authenticate(identity.clone());
//! let agent = RuleSyncAgent::start(config, identity, &transport, engine).await?;
//! ```

pub mod agent;
pub mod config;
pub mod error;

pub use agent::RuleSyncAgent;
pub use config::AgentConfig;
pub use config::EndpointOverride;
pub use error::AgentError;
pub use error::ConfigError;
pub use error::Result;
pub use rulesync_datasource::ApplyOutcome;
pub use rulesync_datasource::ChangeListener;
pub use rulesync_datasource::ConfigSession;
pub use rulesync_datasource::ConfigTransport;
pub use rulesync_datasource::DatasourceConfig;
pub use rulesync_datasource::RuleEngine;
pub use rulesync_datasource::RuleEngineError;
pub use rulesync_datasource::SessionConfig;
pub use rulesync_datasource::SyncError;
pub use rulesync_datasource::SyncHandle;
pub use rulesync_datasource::TransportError;
pub use rulesync_meta::DiscoveryError;
pub use rulesync_meta::EndpointTable;
pub use rulesync_meta::HostProbe;
pub use rulesync_meta::MetaError;
pub use rulesync_meta::NetworkMetadata;
pub use rulesync_meta::NetworkMetadataProvider;
pub use rulesync_meta::ProcessIdentity;
pub use rulesync_meta::SystemHostProbe;
pub use rulesync_rules::CircuitBreakerRule;
pub use rulesync_rules::FlowRule;
pub use rulesync_rules::HotspotRule;
pub use rulesync_rules::RuleCategory;
pub use rulesync_rules::SystemRule;

/// Initialize a tracing subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().try_init();
}

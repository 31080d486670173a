//! Config-push datasource constants.
//!
//! The group id and data-id prefixes are a wire contract with the rule
//! console: changing any of them silently detaches the agent from its rules.

// ============================================================================
// Subscription Naming
// ============================================================================

/// Group under which every rule document is published.
pub const CONFIG_GROUP_ID: &str = "ahas-sentinel";

/// Data-id prefix for flow rules.
pub const FLOW_RULE_DATA_ID_PREFIX: &str = "flow-rule-";

/// Data-id prefix for system-protection rules.
pub const SYSTEM_RULE_DATA_ID_PREFIX: &str = "system-rule-";

/// Data-id prefix for circuit-breaking rules.
///
/// The console still calls these "degrade" rules.
pub const CIRCUIT_BREAKING_RULE_DATA_ID_PREFIX: &str = "degrade-rule-";

/// Data-id prefix for hot-spot parameter rules.
pub const PARAM_FLOW_RULE_DATA_ID_PREFIX: &str = "param-flow-rule-";

/// Separator between the tenant, namespace and app name segments of a data-id.
pub const DATA_ID_SEPARATOR: &str = "-";

// ============================================================================
// Session Readiness
// ============================================================================

/// Default upper bound on waiting for the transport to deliver a session token (30 s).
pub const DEFAULT_SESSION_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Upper bound accepted for a configured session wait (10 minutes).
pub const MAX_SESSION_WAIT_TIMEOUT_MS: u64 = 10 * 60 * 1000;

// ============================================================================
// Transport Session
// ============================================================================

/// Port appended to the transport host when building the session endpoint.
pub const DEFAULT_TRANSPORT_PORT: u16 = 8080;

/// Default request timeout for the config-push session (3 s).
pub const DEFAULT_TRANSPORT_TIMEOUT_MS: u64 = 3_000;

/// Default long-poll listen interval for the config-push session (30 s).
pub const DEFAULT_LISTEN_INTERVAL_MS: u64 = 30_000;

/// Upper bound on the transport request timeout (60 s).
pub const MAX_TRANSPORT_TIMEOUT_MS: u64 = 60_000;

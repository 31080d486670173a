//! Centralized constants for the rulesync agent.
//!
//! Everything that is part of a wire contract (group id, data-id prefixes,
//! default region) or a fixed bound (hot-spot capacity, readiness wait) lives
//! here so the runtime crates never disagree about it.
//!
//! # Modules
//!
//! - [`datasource`]: config-push group, data-id prefixes, session and listen timings
//! - [`meta`]: SDK identity and default region
//! - [`rules`]: translation constants (sentinels, capacities, unit factors)
//!
//! # Usage
//!
//! ```
//! use rulesync_constants::datasource::FLOW_RULE_DATA_ID_PREFIX;
//! use rulesync_constants::rules::PARAMS_MAX_CAPACITY;
//!
//! assert_eq!(FLOW_RULE_DATA_ID_PREFIX, "flow-rule-");
//! assert_eq!(PARAMS_MAX_CAPACITY, 500);
//! ```

mod assertions;
pub mod datasource;
pub mod meta;
pub mod rules;

pub use datasource::CONFIG_GROUP_ID;
pub use datasource::DEFAULT_SESSION_WAIT_TIMEOUT_MS;
pub use meta::DEFAULT_PUBLIC_REGION;
pub use meta::SDK_VERSION;
pub use rules::PARAMS_MAX_CAPACITY;

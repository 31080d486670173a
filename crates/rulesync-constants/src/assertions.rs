//! Compile-time constant assertions.
//!
//! Each assertion pins a relationship between constants that the runtime
//! crates rely on.

use super::datasource::*;
use super::meta::*;
use super::rules::*;

// ============================================================================
// Session Readiness
// ============================================================================

const _: () = assert!(DEFAULT_SESSION_WAIT_TIMEOUT_MS > 0);
const _: () = assert!(DEFAULT_SESSION_WAIT_TIMEOUT_MS <= MAX_SESSION_WAIT_TIMEOUT_MS);

// ============================================================================
// Transport Session
// ============================================================================

const _: () = assert!(DEFAULT_TRANSPORT_PORT > 0);
const _: () = assert!(DEFAULT_TRANSPORT_TIMEOUT_MS > 0);
const _: () = assert!(DEFAULT_TRANSPORT_TIMEOUT_MS <= MAX_TRANSPORT_TIMEOUT_MS);
// Long-poll must outlive a single request or every poll times out
const _: () = assert!(DEFAULT_LISTEN_INTERVAL_MS > DEFAULT_TRANSPORT_TIMEOUT_MS);

// ============================================================================
// Data-id Prefixes
// ============================================================================
// Prefixes already carry their trailing separator.

const fn ends_with_dash(s: &str) -> bool {
    let bytes = s.as_bytes();
    !bytes.is_empty() && bytes[bytes.len() - 1] == b'-'
}

const _: () = assert!(ends_with_dash(FLOW_RULE_DATA_ID_PREFIX));
const _: () = assert!(ends_with_dash(SYSTEM_RULE_DATA_ID_PREFIX));
const _: () = assert!(ends_with_dash(CIRCUIT_BREAKING_RULE_DATA_ID_PREFIX));
const _: () = assert!(ends_with_dash(PARAM_FLOW_RULE_DATA_ID_PREFIX));
const _: () = assert!(!DEFAULT_PUBLIC_REGION.is_empty());

// ============================================================================
// Translation
// ============================================================================

const _: () = assert!(PARAMS_MAX_CAPACITY > 0);
const _: () = assert!(INVALID_SYSTEM_TRIGGER_COUNT < 0.0);
const _: () = assert!(MILLIS_PER_SECOND == 1_000);

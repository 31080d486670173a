//! Rule translation constants.

/// Number of distinct hot-spot parameter values tracked per rule.
pub const PARAMS_MAX_CAPACITY: i64 = 500;

/// Metric type code marking a system rule with no usable threshold.
///
/// Rules carrying this code are never handed to the rule engine.
pub const INVALID_SYSTEM_METRIC_CODE: u32 = 404;

/// Trigger count paired with [`INVALID_SYSTEM_METRIC_CODE`].
pub const INVALID_SYSTEM_TRIGGER_COUNT: f64 = -1.0;

/// Legacy param-flow control behavior selecting throttling.
pub const LEGACY_THROTTLING_BEHAVIOR: u32 = 2;

/// Milliseconds per second, for legacy second-granularity timeouts.
pub const MILLIS_PER_SECOND: u32 = 1_000;

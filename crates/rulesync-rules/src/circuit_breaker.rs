//! Circuit breaking rules, published by the console as "degrade" rules.

use rulesync_constants::rules::MILLIS_PER_SECOND;
use serde::Deserialize;
use serde::Serialize;

use crate::category::RuleCategory;
use crate::de::null_as_default;
use crate::envelope::LegacyRule;
use crate::report::InvalidRule;

/// Condition that trips the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitBreakerStrategy {
    /// Ratio of requests slower than `max_allowed_rt_ms` (legacy grade 0).
    SlowRequestRatio,
    /// Ratio of failed requests (legacy grade 1).
    ErrorRatio,
    /// Absolute number of failed requests (legacy grade 2).
    ErrorCount,
}

impl CircuitBreakerStrategy {
    /// Map a legacy grade. Grades outside 0..=2 have no strategy.
    pub fn from_legacy_grade(grade: u32) -> Option<Self> {
        match grade {
            0 => Some(CircuitBreakerStrategy::SlowRequestRatio),
            1 => Some(CircuitBreakerStrategy::ErrorRatio),
            2 => Some(CircuitBreakerStrategy::ErrorCount),
            _ => None,
        }
    }
}

/// Canonical circuit breaker rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerRule {
    /// Decimal rendering of the legacy numeric id.
    pub id: String,
    pub resource: String,
    pub strategy: CircuitBreakerStrategy,
    /// How long the breaker stays open before probing.
    pub retry_timeout_ms: u32,
    pub min_request_amount: u64,
    pub stat_interval_ms: u32,
    /// Slow-call bound; only meaningful for [`CircuitBreakerStrategy::SlowRequestRatio`].
    pub max_allowed_rt_ms: u64,
    pub threshold: f64,
}

/// Degrade rule as published by the console.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyDegradeRule {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(rename = "count", deserialize_with = "null_as_default")]
    pub threshold: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub grade: u32,
    #[serde(rename = "timeWindow", deserialize_with = "null_as_default")]
    pub retry_timeout_sec: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub min_request_amount: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub slow_ratio_threshold: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub stat_interval_ms: u32,
}

impl LegacyDegradeRule {
    /// Build the canonical rule, or `None` for an unsupported grade.
    ///
    /// For grade 0 the legacy `count` is the RT bound and the ratio comes from
    /// `slowRatioThreshold`.
    pub fn to_circuit_breaker_rule(&self) -> Option<CircuitBreakerRule> {
        let strategy = CircuitBreakerStrategy::from_legacy_grade(self.grade)?;
        let mut rule = CircuitBreakerRule {
            id: self.id.to_string(),
            resource: self.resource.clone(),
            strategy,
            retry_timeout_ms: self.retry_timeout_sec.saturating_mul(MILLIS_PER_SECOND),
            min_request_amount: self.min_request_amount,
            stat_interval_ms: self.stat_interval_ms,
            max_allowed_rt_ms: 0,
            threshold: self.threshold,
        };
        if strategy == CircuitBreakerStrategy::SlowRequestRatio {
            rule.threshold = self.slow_ratio_threshold;
            rule.max_allowed_rt_ms = self.threshold as u64;
        }
        Some(rule)
    }
}

impl LegacyRule for LegacyDegradeRule {
    type Canonical = CircuitBreakerRule;

    const CATEGORY: RuleCategory = RuleCategory::CircuitBreaking;

    fn resource(&self) -> &str {
        &self.resource
    }

    fn translate(&self) -> Result<CircuitBreakerRule, InvalidRule> {
        self.to_circuit_breaker_rule().ok_or(InvalidRule::UnsupportedGrade { grade: self.grade })
    }
}

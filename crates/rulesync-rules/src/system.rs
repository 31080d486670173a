//! System protection rules.
//!
//! A legacy system rule carries up to five thresholds. Exactly one of them
//! becomes the canonical rule's metric, chosen by fixed priority:
//! average RT, max concurrency, inbound QPS, CPU usage, system load. The
//! first value that is `>= 0` wins.

use rulesync_constants::rules::INVALID_SYSTEM_METRIC_CODE;
use rulesync_constants::rules::INVALID_SYSTEM_TRIGGER_COUNT;
use serde::Deserialize;
use serde::Serialize;

use crate::category::RuleCategory;
use crate::de::null_as_default;
use crate::envelope::LegacyRule;
use crate::report::InvalidRule;

/// Process-wide statistic a system rule guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum SystemMetricType {
    Load,
    AvgRt,
    Concurrency,
    InboundQps,
    CpuUsage,
    /// Unknown code. [`SystemMetricType::INVALID`] is one of these.
    Other(u32),
}

impl SystemMetricType {
    /// Marker for a rule with no usable threshold.
    pub const INVALID: SystemMetricType = SystemMetricType::Other(INVALID_SYSTEM_METRIC_CODE);

    /// Whether this metric is enforced with the adaptive (BBR) strategy.
    pub fn is_adaptive(&self) -> bool {
        matches!(self, SystemMetricType::Load | SystemMetricType::CpuUsage)
    }
}

impl From<u32> for SystemMetricType {
    fn from(code: u32) -> Self {
        match code {
            0 => SystemMetricType::Load,
            1 => SystemMetricType::AvgRt,
            2 => SystemMetricType::Concurrency,
            3 => SystemMetricType::InboundQps,
            4 => SystemMetricType::CpuUsage,
            other => SystemMetricType::Other(other),
        }
    }
}

impl From<SystemMetricType> for u32 {
    fn from(value: SystemMetricType) -> Self {
        match value {
            SystemMetricType::Load => 0,
            SystemMetricType::AvgRt => 1,
            SystemMetricType::Concurrency => 2,
            SystemMetricType::InboundQps => 3,
            SystemMetricType::CpuUsage => 4,
            SystemMetricType::Other(code) => code,
        }
    }
}

/// How a system threshold is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveStrategy {
    /// Plain threshold comparison.
    #[default]
    NoAdaptive,
    /// BBR-style adaptive protection.
    Bbr,
}

/// Canonical system protection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRule {
    pub id: u64,
    pub metric_type: SystemMetricType,
    pub trigger_count: f64,
    pub strategy: AdaptiveStrategy,
}

impl SystemRule {
    /// True when the rule carries the no-threshold marker.
    pub fn is_invalid(&self) -> bool {
        self.metric_type == SystemMetricType::INVALID
    }
}

/// System rule as published by the console.
///
/// Absent thresholds decode as `0`, which counts as set. The console writes
/// `-1` for thresholds it does not use.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacySystemRule {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(deserialize_with = "null_as_default")]
    pub highest_system_load: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub highest_cpu_usage: f64,
    #[serde(rename = "qps", deserialize_with = "null_as_default")]
    pub inbound_qps: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_rt: i64,
    #[serde(rename = "maxThread", deserialize_with = "null_as_default")]
    pub max_concurrency: i64,
}

impl LegacySystemRule {
    /// Pick the active metric and its threshold.
    ///
    /// Returns `(SystemMetricType::INVALID, -1.0)` when no threshold is `>= 0`.
    pub fn resolve_metric(&self) -> (SystemMetricType, f64) {
        if self.avg_rt >= 0 {
            return (SystemMetricType::AvgRt, self.avg_rt as f64);
        }
        if self.max_concurrency >= 0 {
            return (SystemMetricType::Concurrency, self.max_concurrency as f64);
        }
        if self.inbound_qps >= 0.0 {
            return (SystemMetricType::InboundQps, self.inbound_qps);
        }
        if self.highest_cpu_usage >= 0.0 {
            return (SystemMetricType::CpuUsage, self.highest_cpu_usage);
        }
        if self.highest_system_load >= 0.0 {
            return (SystemMetricType::Load, self.highest_system_load);
        }
        (SystemMetricType::INVALID, INVALID_SYSTEM_TRIGGER_COUNT)
    }

    /// Build the canonical rule, which may carry the invalid marker.
    pub fn to_system_rule(&self) -> SystemRule {
        let (metric_type, trigger_count) = self.resolve_metric();
        let strategy = if metric_type.is_adaptive() {
            AdaptiveStrategy::Bbr
        } else {
            AdaptiveStrategy::NoAdaptive
        };
        SystemRule {
            id: self.id,
            metric_type,
            trigger_count,
            strategy,
        }
    }
}

impl LegacyRule for LegacySystemRule {
    type Canonical = SystemRule;

    const CATEGORY: RuleCategory = RuleCategory::System;

    fn resource(&self) -> &str {
        &self.resource
    }

    fn translate(&self) -> Result<SystemRule, InvalidRule> {
        let rule = self.to_system_rule();
        if rule.is_invalid() {
            return Err(InvalidRule::NoSystemThreshold);
        }
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::translate_payload;

    fn unset() -> LegacySystemRule {
        LegacySystemRule {
            id: 1,
            resource: "sys".into(),
            highest_system_load: -1.0,
            highest_cpu_usage: -1.0,
            inbound_qps: -1.0,
            avg_rt: -1,
            max_concurrency: -1,
        }
    }

    #[test]
    fn test_avg_rt_wins_over_everything() {
        let rule = LegacySystemRule {
            avg_rt: 20,
            max_concurrency: 5,
            highest_system_load: 3.0,
            ..unset()
        };
        assert_eq!(rule.resolve_metric(), (SystemMetricType::AvgRt, 20.0));
        assert_eq!(rule.to_system_rule().strategy, AdaptiveStrategy::NoAdaptive);
    }

    #[test]
    fn test_priority_order() {
        let rule = LegacySystemRule {
            inbound_qps: 100.0,
            highest_cpu_usage: 0.8,
            ..unset()
        };
        assert_eq!(rule.resolve_metric(), (SystemMetricType::InboundQps, 100.0));

        let rule = LegacySystemRule {
            highest_cpu_usage: 0.8,
            highest_system_load: 4.0,
            ..unset()
        };
        let canonical = rule.to_system_rule();
        assert_eq!(canonical.metric_type, SystemMetricType::CpuUsage);
        assert_eq!(canonical.strategy, AdaptiveStrategy::Bbr);

        let rule = LegacySystemRule {
            highest_system_load: 4.0,
            ..unset()
        };
        let canonical = rule.to_system_rule();
        assert_eq!(canonical.metric_type, SystemMetricType::Load);
        assert_eq!(canonical.trigger_count, 4.0);
        assert_eq!(canonical.strategy, AdaptiveStrategy::Bbr);
    }

    #[test]
    fn test_all_unset_is_invalid() {
        let rule = unset();
        let canonical = rule.to_system_rule();
        assert!(canonical.is_invalid());
        assert_eq!(canonical.trigger_count, -1.0);
        assert_eq!(rule.translate(), Err(InvalidRule::NoSystemThreshold));
    }

    #[test]
    fn test_absent_fields_decode_as_zero() {
        // Only a load threshold is written, but the absent avgRt decodes as 0 and wins.
        let report = translate_payload::<LegacySystemRule>(r#"{"Data":[{"resource":"s","highestSystemLoad":2.5}]}"#)
            .unwrap();
        assert_eq!(report.accepted[0].metric_type, SystemMetricType::AvgRt);
        assert_eq!(report.accepted[0].trigger_count, 0.0);
    }

    #[test]
    fn test_console_payload_with_unused_markers() {
        let payload = r#"{"Data":[
            {"id":1,"resource":"a","highestSystemLoad":-1,"highestCpuUsage":-1,"qps":500,"avgRt":-1,"maxThread":-1},
            {"id":2,"resource":"b","highestSystemLoad":-1,"highestCpuUsage":-1,"qps":-1,"avgRt":-1,"maxThread":-1}
        ]}"#;
        let report = translate_payload::<LegacySystemRule>(payload).unwrap();
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].id, 1);
        assert_eq!(report.accepted[0].metric_type, SystemMetricType::InboundQps);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].resource, "b");
    }

    #[test]
    fn test_metric_codes() {
        assert_eq!(u32::from(SystemMetricType::INVALID), 404);
        assert_eq!(SystemMetricType::from(4), SystemMetricType::CpuUsage);
        assert_eq!(SystemMetricType::from(404), SystemMetricType::INVALID);
    }
}

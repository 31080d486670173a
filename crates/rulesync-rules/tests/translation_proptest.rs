//! Property-based tests for rule translation.
//!
//! Tests cover invariants for:
//! - System metric priority selection
//! - Circuit-breaking grade 0 field cross-assignment
//! - Unsupported circuit-breaking grades
//! - Empty hot-spot override values
//! - Translation idempotence

use proptest::prelude::*;
use rulesync_rules::CircuitBreakerStrategy;
use rulesync_rules::InvalidRule;
use rulesync_rules::LegacyDegradeRule;
use rulesync_rules::LegacyParamFlowItem;
use rulesync_rules::LegacyParamFlowRule;
use rulesync_rules::LegacyRule;
use rulesync_rules::LegacySystemRule;
use rulesync_rules::SystemMetricType;
use rulesync_rules::translate_flow_rules;
use rulesync_rules::translate_hotspot_rules;

// =============================================================================
// Generators
// =============================================================================

/// A threshold that is either unused (negative) or set.
fn system_threshold() -> impl Strategy<Value = f64> {
    prop_oneof![Just(-1.0), -1000.0f64..-0.001, 0.0f64..10_000.0]
}

fn system_threshold_int() -> impl Strategy<Value = i64> {
    prop_oneof![Just(-1i64), -1000i64..0, 0i64..10_000]
}

fn legacy_system_rule() -> impl Strategy<Value = LegacySystemRule> {
    (
        system_threshold(),
        system_threshold(),
        system_threshold(),
        system_threshold_int(),
        system_threshold_int(),
    )
        .prop_map(|(load, cpu, qps, avg_rt, max_concurrency)| LegacySystemRule {
            id: 1,
            resource: "sys".into(),
            highest_system_load: load,
            highest_cpu_usage: cpu,
            inbound_qps: qps,
            avg_rt,
            max_concurrency,
        })
}

fn param_item() -> impl Strategy<Value = LegacyParamFlowItem> {
    (
        prop_oneof![Just(String::new()), "[a-z0-9]{1,8}"],
        -100.0f64..100.0,
        prop_oneof![Just("int"), Just("Long"), Just("bool"), Just("double"), Just("String"), Just("")],
    )
        .prop_map(|(value, threshold, tag)| LegacyParamFlowItem {
            value,
            threshold,
            param_type: tag.to_string(),
        })
}

/// Reference selection: first non-negative threshold in priority order.
fn expected_metric(rule: &LegacySystemRule) -> Option<(SystemMetricType, f64)> {
    let ordered = [
        (SystemMetricType::AvgRt, rule.avg_rt as f64),
        (SystemMetricType::Concurrency, rule.max_concurrency as f64),
        (SystemMetricType::InboundQps, rule.inbound_qps),
        (SystemMetricType::CpuUsage, rule.highest_cpu_usage),
        (SystemMetricType::Load, rule.highest_system_load),
    ];
    ordered.into_iter().find(|(_, value)| *value >= 0.0)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_system_metric_is_first_non_negative(legacy in legacy_system_rule()) {
        match expected_metric(&legacy) {
            Some((metric, count)) => {
                let rule = legacy.translate().unwrap();
                prop_assert_eq!(rule.metric_type, metric);
                prop_assert_eq!(rule.trigger_count, count);
            }
            None => {
                prop_assert!(legacy.to_system_rule().is_invalid());
                prop_assert_eq!(legacy.translate(), Err(InvalidRule::NoSystemThreshold));
            }
        }
    }

    #[test]
    fn prop_slow_ratio_cross_assignment(
        count in 0.0f64..100_000.0,
        ratio in 0.0f64..1.0,
        window in 0u32..3600,
    ) {
        let legacy = LegacyDegradeRule {
            resource: "r".into(),
            threshold: count,
            grade: 0,
            retry_timeout_sec: window,
            slow_ratio_threshold: ratio,
            ..Default::default()
        };
        let rule = legacy.translate().unwrap();
        prop_assert_eq!(rule.strategy, CircuitBreakerStrategy::SlowRequestRatio);
        prop_assert_eq!(rule.threshold, ratio);
        prop_assert_eq!(rule.max_allowed_rt_ms, count as u64);
        prop_assert_eq!(rule.retry_timeout_ms, window * 1000);
    }

    #[test]
    fn prop_unsupported_grade_yields_no_rule(grade in 3u32..=u32::MAX) {
        let legacy = LegacyDegradeRule { grade, ..Default::default() };
        prop_assert!(legacy.to_circuit_breaker_rule().is_none());
        prop_assert_eq!(legacy.translate(), Err(InvalidRule::UnsupportedGrade { grade }));
    }

    #[test]
    fn prop_empty_override_values_are_skipped(items in prop::collection::vec(param_item(), 0..16)) {
        let non_empty: Vec<&LegacyParamFlowItem> = items.iter().filter(|item| !item.value.is_empty()).collect();
        let legacy = LegacyParamFlowRule {
            resource: "r".into(),
            specific_items: items.clone(),
            ..Default::default()
        };
        let rule = legacy.to_hotspot_rule();
        prop_assert_eq!(rule.specific_items.len(), non_empty.len());
        for (canonical, source) in rule.specific_items.iter().zip(non_empty) {
            prop_assert_eq!(&canonical.value, &source.value);
            prop_assert_eq!(canonical.threshold, source.threshold.trunc() as i64);
        }
    }

    #[test]
    fn prop_flow_translation_is_idempotent(
        resource in "[a-zA-Z:/]{1,20}",
        grade in 0i32..3,
        count in 0.0f64..1e6,
        behavior in 0i32..4,
    ) {
        let payload = format!(
            r#"{{"Data":[{{"resource":"{resource}","grade":{grade},"count":{count},"controlBehavior":{behavior}}}]}}"#
        );
        let first = translate_flow_rules(&payload).unwrap().into_accepted();
        let second = translate_flow_rules(&payload).unwrap().into_accepted();
        prop_assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
    }

    #[test]
    fn prop_hotspot_translation_is_idempotent(value in "[a-z0-9]{0,6}", count in -10.0f64..10.0) {
        let payload = format!(
            r#"{{"Data":[{{"resource":"h","paramFlowItemList":[{{"object":"{value}","count":{count},"classType":"int"}}]}}]}}"#
        );
        let first = translate_hotspot_rules(&payload).unwrap().into_accepted();
        let second = translate_hotspot_rules(&payload).unwrap().into_accepted();
        prop_assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
    }
}

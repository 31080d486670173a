//! Flow control rules.
//!
//! Flow rules translate field for field. The enum-valued fields carry the
//! console's numeric codes; codes this build does not know are kept as
//! `Other` so the engine, not the translator, decides what to do with them.

use serde::Deserialize;
use serde::Serialize;

use crate::category::RuleCategory;
use crate::de::null_as_default;
use crate::envelope::LegacyRule;
use crate::report::InvalidRule;

/// Statistic a flow rule limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum FlowMetricType {
    /// Concurrent in-flight calls (code 0).
    #[default]
    Concurrency,
    /// Requests per second (code 1).
    Qps,
    /// Unknown code.
    Other(i32),
}

impl From<i32> for FlowMetricType {
    fn from(code: i32) -> Self {
        match code {
            0 => FlowMetricType::Concurrency,
            1 => FlowMetricType::Qps,
            other => FlowMetricType::Other(other),
        }
    }
}

impl From<FlowMetricType> for i32 {
    fn from(value: FlowMetricType) -> Self {
        match value {
            FlowMetricType::Concurrency => 0,
            FlowMetricType::Qps => 1,
            FlowMetricType::Other(code) => code,
        }
    }
}

/// Which resource's statistics a flow rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum RelationStrategy {
    /// The protected resource itself (code 0).
    #[default]
    CurrentResource,
    /// The rule's `ref_resource` (code 1).
    AssociatedResource,
    /// Unknown code.
    Other(i32),
}

impl From<i32> for RelationStrategy {
    fn from(code: i32) -> Self {
        match code {
            0 => RelationStrategy::CurrentResource,
            1 => RelationStrategy::AssociatedResource,
            other => RelationStrategy::Other(other),
        }
    }
}

impl From<RelationStrategy> for i32 {
    fn from(value: RelationStrategy) -> Self {
        match value {
            RelationStrategy::CurrentResource => 0,
            RelationStrategy::AssociatedResource => 1,
            RelationStrategy::Other(code) => code,
        }
    }
}

/// What happens to traffic over the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ControlBehavior {
    /// Fail fast (code 0).
    #[default]
    Reject,
    /// Ramp the threshold up over `warm_up_period_sec` (code 1).
    WarmUp,
    /// Queue requests at a uniform pace (code 2).
    Throttling,
    /// Warm-up followed by uniform pacing (code 3).
    WarmUpThrottling,
    /// Unknown code.
    Other(i32),
}

impl From<i32> for ControlBehavior {
    fn from(code: i32) -> Self {
        match code {
            0 => ControlBehavior::Reject,
            1 => ControlBehavior::WarmUp,
            2 => ControlBehavior::Throttling,
            3 => ControlBehavior::WarmUpThrottling,
            other => ControlBehavior::Other(other),
        }
    }
}

impl From<ControlBehavior> for i32 {
    fn from(value: ControlBehavior) -> Self {
        match value {
            ControlBehavior::Reject => 0,
            ControlBehavior::WarmUp => 1,
            ControlBehavior::Throttling => 2,
            ControlBehavior::WarmUpThrottling => 3,
            ControlBehavior::Other(code) => code,
        }
    }
}

/// Canonical flow rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRule {
    /// Console-assigned id, 0 when absent.
    pub id: u64,
    /// Protected resource name.
    pub resource: String,
    /// Caller origin the rule applies to (reserved).
    pub limit_origin: String,
    /// Statistic being limited.
    pub metric_type: FlowMetricType,
    /// Threshold for `metric_type`.
    pub count: f64,
    /// Which resource's statistics are checked.
    pub relation_strategy: RelationStrategy,
    /// Over-threshold behavior.
    pub control_behavior: ControlBehavior,
    /// Associated resource for [`RelationStrategy::AssociatedResource`].
    pub ref_resource: String,
    /// Warm-up period for [`ControlBehavior::WarmUp`].
    pub warm_up_period_sec: u32,
    /// Longest a request may queue under [`ControlBehavior::Throttling`].
    pub max_queueing_time_ms: u32,
    /// Cluster-wide rather than local limiting.
    pub cluster_mode: bool,
}

/// Flow rule as published by the console.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyFlowRule {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(rename = "limitApp", deserialize_with = "null_as_default")]
    pub limit_origin: String,
    #[serde(rename = "grade", deserialize_with = "null_as_default")]
    pub metric_type: FlowMetricType,
    #[serde(deserialize_with = "null_as_default")]
    pub count: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub strategy: RelationStrategy,
    #[serde(deserialize_with = "null_as_default")]
    pub control_behavior: ControlBehavior,
    #[serde(deserialize_with = "null_as_default")]
    pub ref_resource: String,
    #[serde(deserialize_with = "null_as_default")]
    pub warm_up_period_sec: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub max_queueing_time_ms: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub cluster_mode: bool,
}

impl LegacyFlowRule {
    /// Copy every field into the canonical rule.
    pub fn to_flow_rule(&self) -> FlowRule {
        FlowRule {
            id: self.id,
            resource: self.resource.clone(),
            limit_origin: self.limit_origin.clone(),
            metric_type: self.metric_type,
            count: self.count,
            relation_strategy: self.strategy,
            control_behavior: self.control_behavior,
            ref_resource: self.ref_resource.clone(),
            warm_up_period_sec: self.warm_up_period_sec,
            max_queueing_time_ms: self.max_queueing_time_ms,
            cluster_mode: self.cluster_mode,
        }
    }
}

impl LegacyRule for LegacyFlowRule {
    type Canonical = FlowRule;

    const CATEGORY: RuleCategory = RuleCategory::Flow;

    fn resource(&self) -> &str {
        &self.resource
    }

    fn translate(&self) -> Result<FlowRule, InvalidRule> {
        Ok(self.to_flow_rule())
    }
}

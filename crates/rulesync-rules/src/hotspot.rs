//! Hot-spot parameter flow rules.
//!
//! A hot-spot rule limits traffic per distinct value of one call argument.
//! The console publishes per-value overrides as string values with a
//! free-text Java-style type tag; translation infers the value kind from
//! the tag and truncates override thresholds to integers.

use rulesync_constants::rules::LEGACY_THROTTLING_BEHAVIOR;
use rulesync_constants::rules::PARAMS_MAX_CAPACITY;
use serde::Deserialize;
use serde::Serialize;

use crate::category::RuleCategory;
use crate::de::null_as_default;
use crate::envelope::LegacyRule;
use crate::report::InvalidRule;

/// Statistic a hot-spot rule limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum HotspotMetricType {
    #[default]
    Concurrency,
    Qps,
    Other(i32),
}

impl From<i32> for HotspotMetricType {
    fn from(code: i32) -> Self {
        match code {
            0 => HotspotMetricType::Concurrency,
            1 => HotspotMetricType::Qps,
            other => HotspotMetricType::Other(other),
        }
    }
}

impl From<HotspotMetricType> for i32 {
    fn from(value: HotspotMetricType) -> Self {
        match value {
            HotspotMetricType::Concurrency => 0,
            HotspotMetricType::Qps => 1,
            HotspotMetricType::Other(code) => code,
        }
    }
}

/// Over-threshold behavior for hot-spot rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotspotControlBehavior {
    #[default]
    Reject,
    Throttling,
}

impl HotspotControlBehavior {
    /// Legacy code 2 throttles; every other code rejects.
    pub fn from_legacy_code(code: u32) -> Self {
        if code == LEGACY_THROTTLING_BEHAVIOR {
            HotspotControlBehavior::Throttling
        } else {
            HotspotControlBehavior::Reject
        }
    }
}

/// Kind of an override value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Int,
    Bool,
    Float64,
    String,
}

impl ParamKind {
    /// Infer the kind from a legacy type tag, ignoring ASCII case.
    ///
    /// Unrecognized tags, including the empty tag, are strings.
    pub fn from_type_tag(tag: &str) -> Self {
        let is = |name: &str| tag.eq_ignore_ascii_case(name);
        if is("int") || is("long") {
            ParamKind::Int
        } else if is("bool") || is("boolean") {
            ParamKind::Bool
        } else if is("double") || is("float") {
            ParamKind::Float64
        } else {
            ParamKind::String
        }
    }
}

/// Per-value threshold override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecificValue {
    pub kind: ParamKind,
    /// Value as published, not parsed.
    pub value: String,
    pub threshold: i64,
}

/// Canonical hot-spot rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotRule {
    pub id: String,
    pub resource: String,
    pub metric_type: HotspotMetricType,
    pub control_behavior: HotspotControlBehavior,
    /// Index of the limited argument in the call's argument list.
    pub param_index: i32,
    pub threshold: f64,
    pub max_queueing_time_ms: i64,
    pub burst_count: i64,
    pub duration_in_sec: i64,
    /// Distinct argument values tracked per rule.
    pub params_max_capacity: i64,
    pub specific_items: Vec<SpecificValue>,
}

/// One `paramFlowItemList` entry.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LegacyParamFlowItem {
    #[serde(rename = "object", deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(rename = "count", deserialize_with = "null_as_default")]
    pub threshold: f64,
    #[serde(rename = "classType", deserialize_with = "null_as_default")]
    pub param_type: String,
}

impl LegacyParamFlowItem {
    /// Override for this item, or `None` when the value is empty.
    pub fn to_specific_value(&self) -> Option<SpecificValue> {
        if self.value.is_empty() {
            return None;
        }
        Some(SpecificValue {
            kind: ParamKind::from_type_tag(&self.param_type),
            value: self.value.clone(),
            threshold: self.threshold as i64,
        })
    }
}

/// Param flow rule as published by the console.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyParamFlowRule {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(rename = "grade", deserialize_with = "null_as_default")]
    pub metric_type: HotspotMetricType,
    #[serde(rename = "count", deserialize_with = "null_as_default")]
    pub threshold: f64,
    #[serde(rename = "paramIdx", deserialize_with = "null_as_default")]
    pub param_index: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub duration_in_sec: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub control_behavior: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub max_queueing_time_ms: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub burst_count: i64,
    #[serde(rename = "paramFlowItemList", deserialize_with = "null_as_default")]
    pub specific_items: Vec<LegacyParamFlowItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub cluster_mode: bool,
}

impl LegacyParamFlowRule {
    /// Canonical hot-spot rule with thresholds truncated to integers.
    pub fn to_hotspot_rule(&self) -> HotspotRule {
        HotspotRule {
            id: self.id.to_string(),
            resource: self.resource.clone(),
            metric_type: self.metric_type,
            control_behavior: HotspotControlBehavior::from_legacy_code(self.control_behavior),
            param_index: self.param_index,
            threshold: self.threshold,
            max_queueing_time_ms: self.max_queueing_time_ms,
            burst_count: self.burst_count,
            duration_in_sec: self.duration_in_sec,
            params_max_capacity: PARAMS_MAX_CAPACITY,
            specific_items: self.specific_items.iter().filter_map(LegacyParamFlowItem::to_specific_value).collect(),
        }
    }
}

impl LegacyRule for LegacyParamFlowRule {
    type Canonical = HotspotRule;

    const CATEGORY: RuleCategory = RuleCategory::HotSpot;

    fn resource(&self) -> &str {
        &self.resource
    }

    fn translate(&self) -> Result<HotspotRule, InvalidRule> {
        Ok(self.to_hotspot_rule())
    }
}

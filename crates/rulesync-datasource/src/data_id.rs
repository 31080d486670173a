//! Data-id naming.
//!
//! Every rule document is addressed as `<prefix><tenant>-<namespace>-<app>`
//! within the [`CONFIG_GROUP_ID`](rulesync_constants::CONFIG_GROUP_ID) group.

use rulesync_constants::datasource::CIRCUIT_BREAKING_RULE_DATA_ID_PREFIX;
use rulesync_constants::datasource::DATA_ID_SEPARATOR;
use rulesync_constants::datasource::FLOW_RULE_DATA_ID_PREFIX;
use rulesync_constants::datasource::PARAM_FLOW_RULE_DATA_ID_PREFIX;
use rulesync_constants::datasource::SYSTEM_RULE_DATA_ID_PREFIX;
use rulesync_rules::RuleCategory;

pub fn data_id_prefix(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Flow => FLOW_RULE_DATA_ID_PREFIX,
        RuleCategory::System => SYSTEM_RULE_DATA_ID_PREFIX,
        RuleCategory::CircuitBreaking => CIRCUIT_BREAKING_RULE_DATA_ID_PREFIX,
        RuleCategory::HotSpot => PARAM_FLOW_RULE_DATA_ID_PREFIX,
    }
}

/// Data-id of a category's rule document.
pub fn data_id(category: RuleCategory, tenant_id: &str, namespace: &str, app_name: &str) -> String {
    let prefix = data_id_prefix(category);
    format!("{prefix}{tenant_id}{DATA_ID_SEPARATOR}{namespace}{DATA_ID_SEPARATOR}{app_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_ids() {
        assert_eq!(data_id(RuleCategory::Flow, "1234", "default", "checkout"), "flow-rule-1234-default-checkout");
        assert_eq!(data_id(RuleCategory::System, "1234", "default", "checkout"), "system-rule-1234-default-checkout");
        assert_eq!(
            data_id(RuleCategory::CircuitBreaking, "1234", "default", "checkout"),
            "degrade-rule-1234-default-checkout"
        );
        assert_eq!(
            data_id(RuleCategory::HotSpot, "1234", "default", "checkout"),
            "param-flow-rule-1234-default-checkout"
        );
    }

    #[test]
    fn test_empty_segments_are_kept() {
        assert_eq!(data_id(RuleCategory::Flow, "", "ns", "app"), "flow-rule--ns-app");
    }
}

//! Rule engine interface.

use async_trait::async_trait;
use rulesync_rules::CircuitBreakerRule;
use rulesync_rules::FlowRule;
use rulesync_rules::HotspotRule;
use rulesync_rules::RuleCategory;
use rulesync_rules::SystemRule;
use snafu::Snafu;

/// The rule engine refused a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum RuleEngineError {
    #[snafu(display("rule engine rejected {} rules: {}", category, reason))]
    Rejected { category: RuleCategory, reason: String },
}

/// In-process enforcer of canonical rules.
///
/// Each call replaces the whole rule set for its category. Implementations
/// return whether the active set actually changed and provide their own
/// synchronization.
#[async_trait]
pub trait RuleEngine: Send + Sync {
    async fn replace_flow_rules(&self, rules: Vec<FlowRule>) -> Result<bool, RuleEngineError>;

    async fn replace_system_rules(&self, rules: Vec<SystemRule>) -> Result<bool, RuleEngineError>;

    async fn replace_circuit_breaking_rules(&self, rules: Vec<CircuitBreakerRule>) -> Result<bool, RuleEngineError>;

    async fn replace_hotspot_rules(&self, rules: Vec<HotspotRule>) -> Result<bool, RuleEngineError>;
}

#[async_trait]
impl<T: RuleEngine + ?Sized> RuleEngine for std::sync::Arc<T> {
    async fn replace_flow_rules(&self, rules: Vec<FlowRule>) -> Result<bool, RuleEngineError> {
        (**self).replace_flow_rules(rules).await
    }

    async fn replace_system_rules(&self, rules: Vec<SystemRule>) -> Result<bool, RuleEngineError> {
        (**self).replace_system_rules(rules).await
    }

    async fn replace_circuit_breaking_rules(&self, rules: Vec<CircuitBreakerRule>) -> Result<bool, RuleEngineError> {
        (**self).replace_circuit_breaking_rules(rules).await
    }

    async fn replace_hotspot_rules(&self, rules: Vec<HotspotRule>) -> Result<bool, RuleEngineError> {
        (**self).replace_hotspot_rules(rules).await
    }
}

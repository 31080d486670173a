//! Rule engine that records what it is given.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rulesync_datasource::RuleEngine;
use rulesync_datasource::RuleEngineError;
use rulesync_rules::CircuitBreakerRule;
use rulesync_rules::FlowRule;
use rulesync_rules::HotspotRule;
use rulesync_rules::RuleCategory;
use rulesync_rules::SystemRule;

#[derive(Debug, Default)]
struct State {
    flow: Vec<FlowRule>,
    system: Vec<SystemRule>,
    circuit_breaking: Vec<CircuitBreakerRule>,
    hotspot: Vec<HotspotRule>,
    replacements: Vec<RuleCategory>,
}

/// [`RuleEngine`] that keeps the latest set per category.
///
/// Replacement reports `true` when the new set differs from the old one.
#[derive(Debug, Default)]
pub struct RecordingRuleEngine {
    state: Mutex<State>,
    rejecting: Mutex<HashSet<RuleCategory>>,
}

impl RecordingRuleEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail every replacement for `category`.
    pub fn reject(&self, category: RuleCategory) {
        self.rejecting.lock().insert(category);
    }

    pub fn flow_rules(&self) -> Vec<FlowRule> {
        self.state.lock().flow.clone()
    }

    pub fn system_rules(&self) -> Vec<SystemRule> {
        self.state.lock().system.clone()
    }

    pub fn circuit_breaking_rules(&self) -> Vec<CircuitBreakerRule> {
        self.state.lock().circuit_breaking.clone()
    }

    pub fn hotspot_rules(&self) -> Vec<HotspotRule> {
        self.state.lock().hotspot.clone()
    }

    /// Categories of successful replacements, in call order.
    pub fn replacements(&self) -> Vec<RuleCategory> {
        self.state.lock().replacements.clone()
    }

    fn check(&self, category: RuleCategory) -> Result<(), RuleEngineError> {
        if self.rejecting.lock().contains(&category) {
            return Err(RuleEngineError::Rejected {
                category,
                reason: "rejected by test engine".into(),
            });
        }
        Ok(())
    }
}

fn swap<R: PartialEq>(slot: &mut Vec<R>, rules: Vec<R>) -> bool {
    let changed = *slot != rules;
    *slot = rules;
    changed
}

#[async_trait]
impl RuleEngine for RecordingRuleEngine {
    async fn replace_flow_rules(&self, rules: Vec<FlowRule>) -> Result<bool, RuleEngineError> {
        self.check(RuleCategory::Flow)?;
        let mut state = self.state.lock();
        state.replacements.push(RuleCategory::Flow);
        Ok(swap(&mut state.flow, rules))
    }

    async fn replace_system_rules(&self, rules: Vec<SystemRule>) -> Result<bool, RuleEngineError> {
        self.check(RuleCategory::System)?;
        let mut state = self.state.lock();
        state.replacements.push(RuleCategory::System);
        Ok(swap(&mut state.system, rules))
    }

    async fn replace_circuit_breaking_rules(&self, rules: Vec<CircuitBreakerRule>) -> Result<bool, RuleEngineError> {
        self.check(RuleCategory::CircuitBreaking)?;
        let mut state = self.state.lock();
        state.replacements.push(RuleCategory::CircuitBreaking);
        Ok(swap(&mut state.circuit_breaking, rules))
    }

    async fn replace_hotspot_rules(&self, rules: Vec<HotspotRule>) -> Result<bool, RuleEngineError> {
        self.check(RuleCategory::HotSpot)?;
        let mut state = self.state.lock();
        state.replacements.push(RuleCategory::HotSpot);
        Ok(swap(&mut state.hotspot, rules))
    }
}

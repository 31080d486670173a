//! Per-category change listeners.
//!
//! A listener turns one published document into one rule-set replacement:
//! decode, translate, drop invalid records, replace. Failures are logged and
//! the engine keeps its previous rule set.

use std::sync::Arc;

use async_trait::async_trait;
use rulesync_rules::DroppedRule;
use rulesync_rules::RuleCategory;
use rulesync_rules::RuleError;
use rulesync_rules::TranslationReport;
use rulesync_rules::translate_circuit_breaking_rules;
use rulesync_rules::translate_flow_rules;
use rulesync_rules::translate_hotspot_rules;
use rulesync_rules::translate_system_rules;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::engine::RuleEngine;
use crate::engine::RuleEngineError;
use crate::transport::ChangeListener;

/// What one change notification did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The engine received the translated set.
    Applied {
        accepted: usize,
        dropped: usize,
        /// Whether the engine's active set changed.
        updated: bool,
    },
    /// The payload was malformed; nothing was replaced.
    DecodeFailed,
    /// The engine refused the set; the previous set stays active.
    EngineRejected,
}

/// Applies documents of one category to the rule engine.
pub struct RuleChangeListener {
    category: RuleCategory,
    engine: Arc<dyn RuleEngine>,
}

impl std::fmt::Debug for RuleChangeListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleChangeListener").field("category", &self.category).finish_non_exhaustive()
    }
}

impl RuleChangeListener {
    pub fn new(category: RuleCategory, engine: Arc<dyn RuleEngine>) -> Self {
        Self { category, engine }
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Decode, translate and hand one payload to the engine.
    pub async fn apply(&self, data_id: &str, payload: &str) -> ApplyOutcome {
        let (accepted, dropped, replaced) = match self.category {
            RuleCategory::Flow => {
                let Some(report) = self.decoded(data_id, translate_flow_rules(payload)) else {
                    return ApplyOutcome::DecodeFailed;
                };
                let (accepted, dropped) = (report.accepted.len(), report.dropped.len());
                (accepted, dropped, self.engine.replace_flow_rules(report.accepted).await)
            }
            RuleCategory::System => {
                let Some(report) = self.decoded(data_id, translate_system_rules(payload)) else {
                    return ApplyOutcome::DecodeFailed;
                };
                let (accepted, dropped) = (report.accepted.len(), report.dropped.len());
                (accepted, dropped, self.engine.replace_system_rules(report.accepted).await)
            }
            RuleCategory::CircuitBreaking => {
                let Some(report) = self.decoded(data_id, translate_circuit_breaking_rules(payload)) else {
                    return ApplyOutcome::DecodeFailed;
                };
                let (accepted, dropped) = (report.accepted.len(), report.dropped.len());
                (accepted, dropped, self.engine.replace_circuit_breaking_rules(report.accepted).await)
            }
            RuleCategory::HotSpot => {
                let Some(report) = self.decoded(data_id, translate_hotspot_rules(payload)) else {
                    return ApplyOutcome::DecodeFailed;
                };
                let (accepted, dropped) = (report.accepted.len(), report.dropped.len());
                (accepted, dropped, self.engine.replace_hotspot_rules(report.accepted).await)
            }
        };
        self.finish(data_id, accepted, dropped, replaced)
    }

    fn decoded<R>(&self, data_id: &str, result: Result<TranslationReport<R>, RuleError>) -> Option<TranslationReport<R>> {
        match result {
            Ok(report) => {
                log_dropped(self.category, data_id, &report.dropped);
                Some(report)
            }
            Err(err) => {
                error!(category = %self.category, data_id = %data_id, error = %err, "failed to parse rules");
                None
            }
        }
    }

    fn finish(
        &self,
        data_id: &str,
        accepted: usize,
        dropped: usize,
        replaced: Result<bool, RuleEngineError>,
    ) -> ApplyOutcome {
        match replaced {
            Ok(updated) => {
                debug!(category = %self.category, data_id = %data_id, accepted, dropped, updated, "rules applied");
                ApplyOutcome::Applied {
                    accepted,
                    dropped,
                    updated,
                }
            }
            Err(err) => {
                error!(category = %self.category, data_id = %data_id, error = %err, "failed to load rules");
                ApplyOutcome::EngineRejected
            }
        }
    }
}

fn log_dropped(category: RuleCategory, data_id: &str, dropped: &[DroppedRule]) {
    for rule in dropped {
        debug!(
            category = %category,
            data_id = %data_id,
            index = rule.index,
            resource = %rule.resource,
            reason = %rule.reason,
            "dropped invalid rule"
        );
    }
}

#[async_trait]
impl ChangeListener for RuleChangeListener {
    async fn on_change(&self, group: &str, data_id: &str, payload: &str) {
        info!(category = %self.category, group = %group, data_id = %data_id, "rule data received");
        let _ = self.apply(data_id, payload).await;
    }
}

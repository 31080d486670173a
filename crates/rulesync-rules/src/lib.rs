//! Legacy rule schema and canonical rule types for rulesync.
//!
//! The rule console publishes rules in a legacy JSON schema, one document per
//! rule category, wrapped in a `{"Version": ..., "Data": [...]}` envelope.
//! This crate decodes those documents and translates every legacy record into
//! the canonical representation the rule engine enforces.
//!
//! Translation is pure: no I/O, no async, no shared state. The same payload
//! always yields the same canonical rules.
//!
//! # Categories
//!
//! | category | legacy record | canonical rule |
//! |----------|---------------|----------------|
//! | flow | [`LegacyFlowRule`] | [`FlowRule`] |
//! | system protection | [`LegacySystemRule`] | [`SystemRule`] |
//! | circuit breaking | [`LegacyDegradeRule`] | [`CircuitBreakerRule`] |
//! | hot-spot parameter | [`LegacyParamFlowRule`] | [`HotspotRule`] |
//!
//! # Error policy
//!
//! - A payload that fails to decode aborts the whole batch ([`RuleError::Decode`]).
//! - A record that decodes but cannot be expressed canonically is dropped and reported in
//!   [`TranslationReport::dropped`]; the rest of the batch is still translated.
//!
//! # Example
//!
//! ```
//! use rulesync_rules::FlowMetricType;
//! use rulesync_rules::translate_flow_rules;
//!
//! let report = translate_flow_rules(r#"{"Data":[{"resource":"r1","grade":1,"count":10}]}"#).unwrap();
//! assert_eq!(report.accepted.len(), 1);
//! assert_eq!(report.accepted[0].resource, "r1");
//! assert_eq!(report.accepted[0].metric_type, FlowMetricType::Qps);
//! ```

pub mod category;
pub mod circuit_breaker;
mod de;
pub mod envelope;
pub mod error;
pub mod flow;
pub mod hotspot;
pub mod report;
pub mod system;

pub use category::RuleCategory;
pub use circuit_breaker::CircuitBreakerRule;
pub use circuit_breaker::CircuitBreakerStrategy;
pub use circuit_breaker::LegacyDegradeRule;
pub use envelope::LegacyRule;
pub use envelope::RuleEnvelope;
pub use envelope::decode_envelope;
pub use envelope::translate_batch;
pub use envelope::translate_payload;
pub use error::Result;
pub use error::RuleError;
pub use flow::ControlBehavior;
pub use flow::FlowMetricType;
pub use flow::FlowRule;
pub use flow::LegacyFlowRule;
pub use flow::RelationStrategy;
pub use hotspot::HotspotControlBehavior;
pub use hotspot::HotspotMetricType;
pub use hotspot::HotspotRule;
pub use hotspot::LegacyParamFlowItem;
pub use hotspot::LegacyParamFlowRule;
pub use hotspot::ParamKind;
pub use hotspot::SpecificValue;
pub use report::DroppedRule;
pub use report::InvalidRule;
pub use report::TranslationReport;
pub use system::AdaptiveStrategy;
pub use system::LegacySystemRule;
pub use system::SystemMetricType;
pub use system::SystemRule;

/// Decode and translate a flow rule document.
pub fn translate_flow_rules(payload: &str) -> Result<TranslationReport<FlowRule>> {
    translate_payload::<LegacyFlowRule>(payload)
}

/// Decode and translate a system-protection rule document.
pub fn translate_system_rules(payload: &str) -> Result<TranslationReport<SystemRule>> {
    translate_payload::<LegacySystemRule>(payload)
}

/// Decode and translate a circuit-breaking ("degrade") rule document.
pub fn translate_circuit_breaking_rules(payload: &str) -> Result<TranslationReport<CircuitBreakerRule>> {
    translate_payload::<LegacyDegradeRule>(payload)
}

/// Decode and translate a hot-spot parameter flow rule document.
pub fn translate_hotspot_rules(payload: &str) -> Result<TranslationReport<HotspotRule>> {
    translate_payload::<LegacyParamFlowRule>(payload)
}

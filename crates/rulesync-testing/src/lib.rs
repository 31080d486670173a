//! In-memory collaborators for rulesync tests.
//!
//! - [`InMemoryConfigTransport`] / [`InMemoryConfigSession`]: config-push transport whose documents are pushed
//!   by the test with `publish`
//! - [`RecordingRuleEngine`]: rule engine that keeps the latest set per category
//! - [`StaticDiscovery`]: discovery service with a canned answer
//! - [`FixedHostProbe`]: host facts without touching the OS

mod engine;
mod host;
mod transport;

pub use engine::RecordingRuleEngine;
pub use host::FixedHostProbe;
pub use host::StaticDiscovery;
pub use transport::InMemoryConfigSession;
pub use transport::InMemoryConfigTransport;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rulesync_datasource::ApplyOutcome;
    use rulesync_datasource::ConfigSession;
    use rulesync_datasource::RuleChangeListener;
    use rulesync_rules::RuleCategory;

    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_engine() {
        let engine = RecordingRuleEngine::new();
        let session = InMemoryConfigSession::new();
        let listener = Arc::new(RuleChangeListener::new(RuleCategory::Flow, engine.clone()));
        session.subscribe("g", "flow-rule-x", listener).await.unwrap();

        let payload = r#"{"Data":[{"resource":"r1","grade":1,"count":10}]}"#;
        assert_eq!(session.publish("flow-rule-x", payload).await, 1);
        assert_eq!(session.publish("other", payload).await, 0);
        assert_eq!(engine.flow_rules().len(), 1);
        assert_eq!(engine.replacements(), vec![RuleCategory::Flow]);
    }

    #[tokio::test]
    async fn test_unchanged_set_is_not_an_update() {
        let engine = RecordingRuleEngine::new();
        let listener = RuleChangeListener::new(RuleCategory::Flow, engine.clone());
        let payload = r#"{"Data":[{"resource":"r1","count":1}]}"#;

        assert!(matches!(listener.apply("d", payload).await, ApplyOutcome::Applied { updated: true, .. }));
        assert!(matches!(listener.apply("d", payload).await, ApplyOutcome::Applied { updated: false, .. }));
    }

    #[tokio::test]
    async fn test_rejecting_engine() {
        let engine = RecordingRuleEngine::new();
        engine.reject(RuleCategory::System);
        let listener = RuleChangeListener::new(RuleCategory::System, engine.clone());
        assert_eq!(listener.apply("d", r#"{"Data":[]}"#).await, ApplyOutcome::EngineRejected);
        assert!(engine.replacements().is_empty());
    }

    #[tokio::test]
    async fn test_failing_subscription() {
        let session = InMemoryConfigSession::new();
        session.fail_subscription("bad");
        let listener = Arc::new(RuleChangeListener::new(RuleCategory::Flow, RecordingRuleEngine::new()));
        assert!(session.subscribe("g", "bad", listener).await.is_err());
        assert!(session.subscribed_data_ids().is_empty());
    }
}

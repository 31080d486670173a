//! Payload envelope and the generic translation driver.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::category::RuleCategory;
use crate::de::null_as_default;
use crate::error::DecodeSnafu;
use crate::error::Result;
use crate::report::DroppedRule;
use crate::report::InvalidRule;
use crate::report::TranslationReport;

/// A legacy rule record that translates into one canonical rule.
pub trait LegacyRule: DeserializeOwned {
    /// Canonical rule produced on success.
    type Canonical;

    /// Category whose payloads carry this record.
    const CATEGORY: RuleCategory;

    /// Resource the record protects.
    fn resource(&self) -> &str;

    /// Translate into the canonical representation.
    ///
    /// # Errors
    ///
    /// Returns the reason the record has no canonical form. Callers drop the
    /// record and keep translating the rest of the batch.
    fn translate(&self) -> std::result::Result<Self::Canonical, InvalidRule>;
}

/// Document published on a rule data-id.
///
/// Only `Data` is consumed. A missing or `null` `Data` is an empty batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RuleEnvelope<T> {
    /// Console-side version tag.
    #[serde(rename = "Version", alias = "version", default, deserialize_with = "null_as_default")]
    pub version: String,

    /// Legacy rule records.
    #[serde(rename = "Data", alias = "data", default, deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

/// Decode a payload into its envelope.
///
/// # Errors
///
/// Returns [`crate::RuleError::Decode`] if the payload or any record in it is malformed.
pub fn decode_envelope<L: LegacyRule>(payload: &str) -> Result<RuleEnvelope<L>> {
    serde_json::from_str(payload).context(DecodeSnafu { category: L::CATEGORY })
}

/// Translate decoded records, dropping those without a canonical form.
pub fn translate_batch<L: LegacyRule>(records: &[L]) -> TranslationReport<L::Canonical> {
    let mut report = TranslationReport {
        accepted: Vec::with_capacity(records.len()),
        dropped: Vec::new(),
    };
    for (index, record) in records.iter().enumerate() {
        match record.translate() {
            Ok(rule) => report.accepted.push(rule),
            Err(reason) => report.dropped.push(DroppedRule {
                index,
                resource: record.resource().to_string(),
                reason,
            }),
        }
    }
    report
}

/// Decode a payload and translate every record in it.
///
/// # Errors
///
/// Returns [`crate::RuleError::Decode`] if the payload is malformed; nothing is
/// translated in that case.
pub fn translate_payload<L: LegacyRule>(payload: &str) -> Result<TranslationReport<L::Canonical>> {
    let envelope = decode_envelope::<L>(payload)?;
    Ok(translate_batch(&envelope.data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit_breaker::LegacyDegradeRule;
    use crate::flow::LegacyFlowRule;

    #[test]
    fn test_missing_data_is_empty_batch() {
        let report = translate_payload::<LegacyFlowRule>(r#"{"Version":"3"}"#).unwrap();
        assert_eq!(report.total(), 0);

        let report = translate_payload::<LegacyFlowRule>(r#"{"Version":"3","Data":null}"#).unwrap();
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_version_is_decoded_but_unused() {
        let envelope = decode_envelope::<LegacyFlowRule>(r#"{"Version":"v7","Data":[]}"#).unwrap();
        assert_eq!(envelope.version, "v7");
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn test_lowercase_envelope_keys() {
        let envelope = decode_envelope::<LegacyFlowRule>(r#"{"version":"1","data":[{"resource":"a"}]}"#).unwrap();
        assert_eq!(envelope.data.len(), 1);
    }

    #[test]
    fn test_malformed_record_fails_whole_batch() {
        let payload = r#"{"Data":[{"resource":"ok","grade":1},{"resource":"bad","grade":"one"}]}"#;
        let err = translate_payload::<LegacyDegradeRule>(payload).unwrap_err();
        assert_eq!(err.category(), RuleCategory::CircuitBreaking);
    }

    #[test]
    fn test_invalid_record_is_dropped_not_fatal() {
        let payload = r#"{"Data":[{"resource":"a","grade":1},{"resource":"b","grade":9},{"resource":"c","grade":2}]}"#;
        let report = translate_payload::<LegacyDegradeRule>(payload).unwrap();
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].index, 1);
        assert_eq!(report.dropped[0].resource, "b");
        assert_eq!(report.dropped[0].reason, InvalidRule::UnsupportedGrade { grade: 9 });
    }
}

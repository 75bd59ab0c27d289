//! Package-data presence rule

use super::{present, AuditRule, RuleAction};
use crate::model::PackageConfig;

/// Flags records whose `packageData` payload is absent.
///
/// The payload drives the rendered pricing cards and cannot be reconstructed
/// from anything else in the record, so there is no auto-fix: absence always
/// goes to manual review.
pub struct PackageDataRule;

impl AuditRule for PackageDataRule {
    fn id(&self) -> &str {
        "package_data"
    }

    fn name(&self) -> &str {
        "Package data presence"
    }

    fn description(&self) -> &str {
        "Flags records missing the packageData payload for manual review"
    }

    fn evaluate(&self, record: &PackageConfig) -> Vec<RuleAction> {
        if present(record.package_data.as_ref()).is_some() {
            return vec![];
        }

        vec![RuleAction::Flag {
            description: format!(
                "{}: packageData is missing and must be restored manually",
                record.label()
            ),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_absent_payload_is_flagged_never_repaired() {
        for value in [None, Some(Value::Null)] {
            let mut record = PackageConfig::with_id("rec_data");
            record.package_data = value;

            let actions = PackageDataRule.evaluate(&record);
            assert_eq!(actions.len(), 1);
            assert!(!actions[0].is_repair());
            assert!(actions[0].description().contains("packageData"));
        }
    }

    #[test]
    fn test_present_payload_passes() {
        let mut record = PackageConfig::with_id("rec_data");
        record.package_data = Some(json!({"cards": []}));
        assert!(PackageDataRule.evaluate(&record).is_empty());
    }
}

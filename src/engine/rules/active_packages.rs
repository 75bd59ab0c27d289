//! Active-packages presence rule

use serde_json::{json, Value};

use super::{present, AuditRule, RuleAction};
use crate::model::PackageConfig;

/// Defaults `activePackages` when the field is entirely absent.
///
/// Unlike the dual-mode text fields, a present value is accepted in any
/// shape; this rule only restores the field for records that never had it.
pub struct ActivePackagesRule;

fn default_active_packages() -> Value {
    json!({
        "onetime": ["starter", "growth", "premium"],
        "retainer": ["starter", "growth", "premium"],
    })
}

impl AuditRule for ActivePackagesRule {
    fn id(&self) -> &str {
        "active_packages"
    }

    fn name(&self) -> &str {
        "Active packages presence"
    }

    fn description(&self) -> &str {
        "Restores a default set of enabled tiers when activePackages is absent"
    }

    fn evaluate(&self, record: &PackageConfig) -> Vec<RuleAction> {
        if present(record.active_packages.as_ref()).is_some() {
            return vec![];
        }

        vec![RuleAction::Repair {
            field: "activePackages",
            value: default_active_packages(),
            description: format!(
                "{}: activePackages was missing, enabled starter/growth/premium for both modes",
                record.label()
            ),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_gets_default_tiers() {
        let record = PackageConfig::with_id("rec_active");
        let actions = ActivePackagesRule.evaluate(&record);

        assert_eq!(actions.len(), 1);
        match &actions[0] {
            RuleAction::Repair { field, value, .. } => {
                assert_eq!(*field, "activePackages");
                assert_eq!(value["onetime"], json!(["starter", "growth", "premium"]));
                assert_eq!(value["retainer"], json!(["starter", "growth", "premium"]));
            }
            other => panic!("expected repair, got {:?}", other),
        }
    }

    #[test]
    fn test_present_value_untouched_in_any_shape() {
        // Canonical shape
        let mut record = PackageConfig::with_id("rec_active");
        record.active_packages = Some(json!({"onetime": ["starter"], "retainer": []}));
        assert!(ActivePackagesRule.evaluate(&record).is_empty());

        // Legacy flat list is also left alone; presence is all this rule checks
        record.active_packages = Some(json!(["starter", "elite"]));
        assert!(ActivePackagesRule.evaluate(&record).is_empty());
    }
}

//! Popular-index shape rule
//!
//! `popularPackageIndex` marks which pricing card is highlighted. The current
//! schema stores one index per mode; records written before the retainer
//! launch hold a bare integer, and some records never had the field at all.

use serde_json::{json, Value};

use super::{present, AuditRule, RuleAction};
use crate::model::PackageConfig;

/// Neutral highlight position used when no index was ever stored
const DEFAULT_INDEX: i64 = 2;

/// Migrates `popularPackageIndex` to the dual-mode shape
pub struct PopularIndexRule;

impl AuditRule for PopularIndexRule {
    fn id(&self) -> &str {
        "popular_index"
    }

    fn name(&self) -> &str {
        "Popular index shape"
    }

    fn description(&self) -> &str {
        "Migrates bare popular-package indexes to the per-mode shape and \
         defaults absent ones"
    }

    fn evaluate(&self, record: &PackageConfig) -> Vec<RuleAction> {
        match present(record.popular_package_index.as_ref()) {
            Some(Value::Number(n)) => {
                // Legacy bare index: preserve the value under both modes
                let value = json!({ "onetime": n, "retainer": n });
                vec![RuleAction::Repair {
                    field: "popularPackageIndex",
                    value,
                    description: format!(
                        "{}: popularPackageIndex was a bare index ({}), replicated under both modes",
                        record.label(),
                        n
                    ),
                }]
            }
            None => {
                let value = json!({ "onetime": DEFAULT_INDEX, "retainer": DEFAULT_INDEX });
                vec![RuleAction::Repair {
                    field: "popularPackageIndex",
                    value,
                    description: format!(
                        "{}: popularPackageIndex was missing, defaulted to {} for both modes",
                        record.label(),
                        DEFAULT_INDEX
                    ),
                }]
            }
            // Dual-mode shaped, or some other type this rule does not judge
            Some(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with_index(value: Option<Value>) -> PackageConfig {
        let mut record = PackageConfig::with_id("rec_pop");
        record.popular_package_index = value;
        record
    }

    #[test]
    fn test_bare_number_replicated_under_both_modes() {
        let record = record_with_index(Some(json!(3)));
        let actions = PopularIndexRule.evaluate(&record);

        assert_eq!(actions.len(), 1);
        match &actions[0] {
            RuleAction::Repair { field, value, description } => {
                assert_eq!(*field, "popularPackageIndex");
                assert_eq!(*value, json!({"onetime": 3, "retainer": 3}));
                assert!(description.contains("rec_pop"));
            }
            other => panic!("expected repair, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_defaults_to_neutral_index() {
        for value in [None, Some(Value::Null)] {
            let record = record_with_index(value);
            let actions = PopularIndexRule.evaluate(&record);

            assert_eq!(actions.len(), 1);
            match &actions[0] {
                RuleAction::Repair { value, .. } => {
                    assert_eq!(*value, json!({"onetime": 2, "retainer": 2}));
                }
                other => panic!("expected repair, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_dual_mode_shape_untouched() {
        let record = record_with_index(Some(json!({"onetime": 1, "retainer": 0})));
        assert!(PopularIndexRule.evaluate(&record).is_empty());
    }

    #[test]
    fn test_unexpected_type_untouched() {
        let record = record_with_index(Some(json!("2")));
        assert!(PopularIndexRule.evaluate(&record).is_empty());
    }

    #[test]
    fn test_zero_index_preserved() {
        let record = record_with_index(Some(json!(0)));
        let actions = PopularIndexRule.evaluate(&record);
        match &actions[0] {
            RuleAction::Repair { value, .. } => {
                assert_eq!(*value, json!({"onetime": 0, "retainer": 0}));
            }
            other => panic!("expected repair, got {:?}", other),
        }
    }
}

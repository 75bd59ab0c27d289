//! Rule table for the schema audit
//!
//! Each rule inspects one aspect of a package-configuration record and either
//! computes an idempotent repair (a single-field partial update plus a fix
//! description) or flags an issue for manual review. Rules are evaluated
//! independently and unconditionally, so one record can produce several
//! repairs and several flags in the same pass.
//!
//! The per-field policies are deliberately asymmetric and must stay that way:
//! the three dual-mode text fields repair only when present without an
//! `onetime` key, `activePackages` repairs only when entirely absent, and
//! `popularPackageIndex` repairs on both a bare number and absence.

pub mod active_packages;
pub mod dual_mode;
pub mod package_data;
pub mod popular_index;
pub mod price;

pub use active_packages::ActivePackagesRule;
pub use dual_mode::{DualModeTextRule, TierDefault};
pub use package_data::PackageDataRule;
pub use popular_index::PopularIndexRule;
pub use price::PriceRule;

use serde_json::Value;

use crate::model::PackageConfig;

/// Outcome of evaluating one rule against one record
#[derive(Debug, Clone, PartialEq)]
pub enum RuleAction {
    /// Apply an idempotent single-field correction to the record
    Repair {
        /// Store field name to patch
        field: &'static str,
        /// Canonical replacement value
        value: Value,
        /// Human-readable fix description naming record and field
        description: String,
    },
    /// Record a data problem with no safe automatic correction
    Flag {
        /// Human-readable issue description naming record and field
        description: String,
    },
}

impl RuleAction {
    /// Whether this action is a repair
    pub fn is_repair(&self) -> bool {
        matches!(self, RuleAction::Repair { .. })
    }

    /// The human-readable description of this action
    pub fn description(&self) -> &str {
        match self {
            RuleAction::Repair { description, .. } => description,
            RuleAction::Flag { description } => description,
        }
    }
}

/// Trait for schema audit rules
///
/// Rules are deterministic and synchronous: they read one record snapshot and
/// produce actions without touching the store. The engine owns applying
/// repairs and aggregating descriptions.
pub trait AuditRule: Send + Sync {
    /// Unique identifier for this rule instance
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// What this rule checks
    fn description(&self) -> &str;

    /// Evaluate the rule against a record snapshot
    fn evaluate(&self, record: &PackageConfig) -> Vec<RuleAction>;
}

/// A boxed rule for dynamic dispatch
pub type BoxedRule = Box<dyn AuditRule>;

/// The full rule table, in evaluation order
pub fn default_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(PopularIndexRule),
        Box::new(DualModeTextRule::descriptions()),
        Box::new(DualModeTextRule::button_links()),
        Box::new(DualModeTextRule::package_names()),
        Box::new(ActivePackagesRule),
        Box::new(PackageDataRule),
        Box::new(PriceRule::starter()),
        Box::new(PriceRule::growth()),
        Box::new(PriceRule::premium()),
    ]
}

/// Resolve an optional raw field, treating JSON `null` the same as absence.
/// The store's SDK historically wrote both for cleared fields.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) | None => None,
        Some(v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_table_order() {
        let rules = default_rules();
        let ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            [
                "popular_index",
                "dual_mode_descriptions",
                "dual_mode_buttonLinks",
                "dual_mode_packageNames",
                "active_packages",
                "package_data",
                "price_starter",
                "price_growth",
                "price_premium",
            ]
        );
    }

    #[test]
    fn test_present_treats_null_as_absent() {
        assert!(present(Some(&Value::Null)).is_none());
        assert!(present(None).is_none());
        assert!(present(Some(&serde_json::json!(2))).is_some());
    }

    #[test]
    fn test_rule_action_accessors() {
        let repair = RuleAction::Repair {
            field: "activePackages",
            value: serde_json::json!({}),
            description: "fixed".to_string(),
        };
        assert!(repair.is_repair());
        assert_eq!(repair.description(), "fixed");

        let flag = RuleAction::Flag {
            description: "flagged".to_string(),
        };
        assert!(!flag.is_repair());
        assert_eq!(flag.description(), "flagged");
    }
}

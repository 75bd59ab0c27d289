//! Legacy flat shape -> dual-mode shape migration
//!
//! Three text fields (`descriptions`, `buttonLinks`, `packageNames`) share
//! the same history: they used to be flat tier-keyed maps and now hold one
//! such map per mode. The migration is identical for all three; only the
//! default used for a missing tier differs, so the rule is parameterized by
//! field accessor and default policy.
//!
//! An entirely absent field is left alone. Only a present field lacking the
//! `onetime` sub-key is treated as the legacy shape.

use serde_json::{Map, Value};

use super::{present, AuditRule, RuleAction};
use crate::model::{Mode, PackageConfig, Tier};

/// Default applied to a tier that the legacy map does not cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierDefault {
    /// Empty string (descriptions, button links)
    Empty,
    /// The tier's capitalized display name (package names)
    DisplayName,
}

impl TierDefault {
    fn value_for(&self, tier: Tier) -> Value {
        match self {
            TierDefault::Empty => Value::String(String::new()),
            TierDefault::DisplayName => Value::String(tier.display_name().to_string()),
        }
    }
}

/// Migrates one flat tier-keyed text field to the dual-mode shape
pub struct DualModeTextRule {
    id: String,
    name: &'static str,
    field: &'static str,
    accessor: fn(&PackageConfig) -> Option<&Value>,
    default: TierDefault,
}

impl DualModeTextRule {
    fn new(
        name: &'static str,
        field: &'static str,
        accessor: fn(&PackageConfig) -> Option<&Value>,
        default: TierDefault,
    ) -> Self {
        Self {
            id: format!("dual_mode_{}", field),
            name,
            field,
            accessor,
            default,
        }
    }

    /// Rule instance for the `descriptions` field
    pub fn descriptions() -> Self {
        Self::new(
            "Descriptions shape",
            "descriptions",
            |r| r.descriptions.as_ref(),
            TierDefault::Empty,
        )
    }

    /// Rule instance for the `buttonLinks` field
    pub fn button_links() -> Self {
        Self::new(
            "Button links shape",
            "buttonLinks",
            |r| r.button_links.as_ref(),
            TierDefault::Empty,
        )
    }

    /// Rule instance for the `packageNames` field
    pub fn package_names() -> Self {
        Self::new(
            "Package names shape",
            "packageNames",
            |r| r.package_names.as_ref(),
            TierDefault::DisplayName,
        )
    }

    /// Build the canonical dual-mode value from a legacy flat map.
    ///
    /// Every tier is carried over verbatim when the legacy map covers it and
    /// defaulted otherwise; the completed map is replicated under both modes.
    fn migrate(&self, legacy: &Map<String, Value>) -> Value {
        let mut per_tier = Map::new();
        for tier in Tier::ALL {
            let entry = match legacy.get(tier.key()) {
                Some(Value::Null) | None => self.default.value_for(tier),
                Some(v) => v.clone(),
            };
            per_tier.insert(tier.key().to_string(), entry);
        }

        let mut dual = Map::new();
        for mode in Mode::ALL {
            dual.insert(mode.key().to_string(), Value::Object(per_tier.clone()));
        }
        Value::Object(dual)
    }
}

impl AuditRule for DualModeTextRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Replicates legacy flat tier-keyed text maps under both billing modes"
    }

    fn evaluate(&self, record: &PackageConfig) -> Vec<RuleAction> {
        let value = match present((self.accessor)(record)) {
            Some(v) => v,
            // Entirely absent is not this rule's business
            None => return vec![],
        };

        let legacy = match value {
            Value::Object(map) if map.contains_key(Mode::Onetime.key()) => return vec![],
            Value::Object(map) => map.clone(),
            // Present but not even a map: migrate as an empty legacy map so
            // the record ends up canonical
            _ => Map::new(),
        };

        vec![RuleAction::Repair {
            field: self.field,
            value: self.migrate(&legacy),
            description: format!(
                "{}: {} held the legacy flat shape, replicated under both modes",
                record.label(),
                self.field
            ),
        }]
    }
}

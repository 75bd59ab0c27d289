//! Price presence rules
//!
//! One rule instance per priced tier. A price is an issue when it is falsy
//! without being the number zero: an explicit zero is a deliberate "free"
//! price, while null or absent means nobody ever set one. No auto-fix exists;
//! inventing a price would be worse than flagging it.
//!
//! Only the first three tiers carry a price field. Elite pricing is quoted
//! per client and has no stored price to check.

use serde_json::Value;

use super::{AuditRule, RuleAction};
use crate::model::{price_is_missing, PackageConfig, Tier};

/// Flags a missing price for one tier
pub struct PriceRule {
    id: String,
    name: String,
    tier: Tier,
    field: &'static str,
    accessor: fn(&PackageConfig) -> Option<&Value>,
}

impl PriceRule {
    fn new(
        tier: Tier,
        field: &'static str,
        accessor: fn(&PackageConfig) -> Option<&Value>,
    ) -> Self {
        Self {
            id: format!("price_{}", tier.key()),
            name: format!("{} price presence", tier.display_name()),
            tier,
            field,
            accessor,
        }
    }

    /// Rule instance for the starter-tier price
    pub fn starter() -> Self {
        Self::new(Tier::Starter, "priceStarter", |r| r.price_starter.as_ref())
    }

    /// Rule instance for the growth-tier price
    pub fn growth() -> Self {
        Self::new(Tier::Growth, "priceGrowth", |r| r.price_growth.as_ref())
    }

    /// Rule instance for the premium-tier price
    pub fn premium() -> Self {
        Self::new(Tier::Premium, "pricePremium", |r| r.price_premium.as_ref())
    }
}

impl AuditRule for PriceRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Flags tiers whose price was never set; explicit zero is valid"
    }

    fn evaluate(&self, record: &PackageConfig) -> Vec<RuleAction> {
        if !price_is_missing((self.accessor)(record)) {
            return vec![];
        }

        vec![RuleAction::Flag {
            description: format!(
                "{}: {} is not set for the {} tier",
                record.label(),
                self.field,
                self.tier.key()
            ),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_price_is_flagged() {
        let record = PackageConfig::with_id("rec_price");
        let actions = PriceRule::growth().evaluate(&record);

        assert_eq!(actions.len(), 1);
        assert!(!actions[0].is_repair());
        assert!(actions[0].description().contains("priceGrowth"));
    }

    #[test]
    fn test_zero_price_is_valid() {
        let mut record = PackageConfig::with_id("rec_price");
        record.price_growth = Some(json!(0));
        assert!(PriceRule::growth().evaluate(&record).is_empty());
    }

    #[test]
    fn test_each_tier_checks_its_own_field() {
        let mut record = PackageConfig::with_id("rec_price");
        record.price_starter = Some(json!(99));
        record.price_premium = Some(json!(499));

        assert!(PriceRule::starter().evaluate(&record).is_empty());
        assert_eq!(PriceRule::growth().evaluate(&record).len(), 1);
        assert!(PriceRule::premium().evaluate(&record).is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_numeric_price_is_never_flagged(price in proptest::num::f64::NORMAL) {
                let mut record = PackageConfig::with_id("rec_prop");
                record.price_starter = serde_json::Number::from_f64(price).map(Value::Number);
                prop_assume!(record.price_starter.is_some());
                prop_assert!(PriceRule::starter().evaluate(&record).is_empty());
            }
        }
    }
}

//! Schema audit engine
//!
//! `SchemaAuditor` is the daily health-check routine: it loads every
//! package-configuration record, evaluates the rule table against each one,
//! applies repairs as immediate single-field partial updates, and persists an
//! immutable `HealthReport` for the run.
//!
//! Records are processed one at a time and independently. Each repair is its
//! own store round-trip, so a crash mid-run leaves already-processed records
//! forward-migrated and the rest untouched; re-running the audit fixes only
//! what remains non-canonical.

pub mod rules;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Map;

use crate::auth::CallerIdentity;
use crate::client::RecordStore;
use crate::error::{AuditError, Result};
use crate::model::{HealthReport, PackageConfig};
use rules::{default_rules, BoxedRule, RuleAction};

/// The configuration health-check and auto-repair engine
pub struct SchemaAuditor {
    store: Arc<dyn RecordStore>,
    rules: Vec<BoxedRule>,
}

impl SchemaAuditor {
    /// Create an auditor with the default rule table
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            rules: default_rules(),
        }
    }

    /// Create an auditor with an explicit rule table; used by tests to
    /// exercise rules in isolation
    pub fn with_rules(store: Arc<dyn RecordStore>, rules: Vec<BoxedRule>) -> Self {
        Self { store, rules }
    }

    /// The rule table, in evaluation order
    pub fn rules(&self) -> &[BoxedRule] {
        &self.rules
    }

    /// Run one full audit and return the persisted report.
    ///
    /// Fails with `Forbidden` before any record is read unless the caller
    /// holds the admin role. A store failure aborts the remainder of the run;
    /// repairs already written stay in effect and the caller gets the error
    /// instead of a report.
    pub async fn run_audit(&self, caller: &CallerIdentity) -> Result<HealthReport> {
        if !caller.is_admin() {
            tracing::warn!(
                subject = %caller.subject,
                role = %caller.role,
                "Audit rejected: caller is not an admin"
            );
            return Err(AuditError::Forbidden {
                subject: caller.subject.clone(),
                role: caller.role,
            });
        }

        let run_at = Utc::now();
        tracing::info!(subject = %caller.subject, "Starting package health audit");

        let records = self.store.list_package_configs().await?;
        tracing::info!(total = records.len(), "Loaded package configurations");

        let mut fixes: Vec<String> = Vec::new();
        let mut issues: Vec<String> = Vec::new();
        let mut auto_fixed = 0usize;

        for record in &records {
            let fixed = self.audit_record(record, &mut fixes, &mut issues).await?;
            if fixed {
                auto_fixed += 1;
            }
        }

        let report = HealthReport::from_run(run_at, records.len(), auto_fixed, fixes, issues);
        let stored = self.store.create_health_report(&report).await?;

        tracing::info!(
            total = stored.total_packages,
            auto_fixed = stored.auto_fixed,
            needs_attention = stored.needs_attention,
            status = %stored.status,
            "Package health audit complete"
        );
        Ok(stored)
    }

    /// Evaluate every rule against one record snapshot, applying repairs as
    /// they are found. Returns whether the record received any fix.
    async fn audit_record(
        &self,
        record: &PackageConfig,
        fixes: &mut Vec<String>,
        issues: &mut Vec<String>,
    ) -> Result<bool> {
        let mut fixed = false;

        for rule in &self.rules {
            for action in rule.evaluate(record) {
                match action {
                    RuleAction::Repair {
                        field,
                        value,
                        description,
                    } => {
                        let mut patch = Map::new();
                        patch.insert(field.to_string(), value);
                        self.store.update_package_config(&record.id, patch).await?;

                        tracing::debug!(
                            record = %record.id,
                            rule = rule.id(),
                            field,
                            "Applied automatic fix"
                        );
                        fixes.push(description);
                        fixed = true;
                    }
                    RuleAction::Flag { description } => {
                        tracing::debug!(
                            record = %record.id,
                            rule = rule.id(),
                            "Flagged issue for manual review"
                        );
                        issues.push(description);
                    }
                }
            }
        }

        Ok(fixed)
    }
}

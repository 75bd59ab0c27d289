//! Prometheus metrics for audit runs
//!
//! - `package_health_audit_runs_total` (counter) - runs by outcome
//! - `package_health_audit_duration_seconds` (histogram) - run duration
//! - `package_health_records_scanned_total` (counter) - records read
//! - `package_health_fixes_applied_total` (counter) - automatic fixes written
//! - `package_health_issues_flagged_total` (counter) - issues for review

use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

use super::{MetricsError, Result};
use crate::model::HealthReport;

/// Metric namespace shared by every series this agent exports
const NAMESPACE: &str = "package_health";

/// Audit metrics handles
pub struct AuditMetrics {
    runs_total: CounterVec,
    duration_seconds: Histogram,
    records_scanned_total: Counter,
    fixes_applied_total: Counter,
    issues_flagged_total: Counter,
}

impl AuditMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let runs_total = CounterVec::new(
            Opts::new("audit_runs_total", "Total audit runs by outcome").namespace(NAMESPACE),
            &["result"],
        )?;
        registry.register(Box::new(runs_total.clone()))?;

        let duration_seconds = Histogram::with_opts(
            HistogramOpts::new("audit_duration_seconds", "Audit run duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(duration_seconds.clone()))?;

        let records_scanned_total = Counter::with_opts(
            Opts::new("records_scanned_total", "Package configurations scanned")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(records_scanned_total.clone()))?;

        let fixes_applied_total = Counter::with_opts(
            Opts::new("fixes_applied_total", "Automatic fixes written to the store")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(fixes_applied_total.clone()))?;

        let issues_flagged_total = Counter::with_opts(
            Opts::new("issues_flagged_total", "Issues flagged for manual review")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(issues_flagged_total.clone()))?;

        Ok(Self {
            runs_total,
            duration_seconds,
            records_scanned_total,
            fixes_applied_total,
            issues_flagged_total,
        })
    }

    /// Record a completed run from its report
    pub fn record_run(&self, report: &HealthReport, duration_secs: f64) {
        self.runs_total.with_label_values(&["completed"]).inc();
        self.duration_seconds.observe(duration_secs);
        self.records_scanned_total.inc_by(report.total_packages as f64);
        self.fixes_applied_total.inc_by(report.fixes.len() as f64);
        self.issues_flagged_total.inc_by(report.issues.len() as f64);
    }

    /// Record a run rejected for lack of the admin role
    pub fn record_forbidden(&self) {
        self.runs_total.with_label_values(&["forbidden"]).inc();
    }

    /// Record a run aborted by a failure
    pub fn record_failure(&self) {
        self.runs_total.with_label_values(&["failed"]).inc();
    }
}

/// Registry wrapper owning the agent's metric families
pub struct AuditMetricsRegistry {
    registry: Arc<Registry>,
    audit: AuditMetrics,
}

impl AuditMetricsRegistry {
    /// Create a registry with all audit metrics registered
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let audit = AuditMetrics::new(&registry)?;
        Ok(Self { registry, audit })
    }

    /// Audit metrics handles
    pub fn audit(&self) -> &AuditMetrics {
        &self.audit
    }

    /// Encode all registered metrics in the Prometheus text format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        encoder
            .encode_to_string(&self.registry.gather())
            .map_err(|e| MetricsError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_registry_creates_and_encodes() {
        let registry = AuditMetricsRegistry::new().unwrap();

        let report = HealthReport::from_run(
            Utc::now(),
            4,
            1,
            vec!["fix".to_string()],
            vec!["issue a".to_string(), "issue b".to_string()],
        );
        registry.audit().record_run(&report, 0.2);
        registry.audit().record_forbidden();

        let text = registry.encode().unwrap();
        assert!(text.contains("package_health_audit_runs_total"));
        assert!(text.contains("package_health_records_scanned_total 4"));
        assert!(text.contains("package_health_fixes_applied_total 1"));
        assert!(text.contains("package_health_issues_flagged_total 2"));
    }
}

//! Domain types for the Package Health Agent
//!
//! `PackageConfig` mirrors the record store's package-configuration
//! collection. The store schema has evolved: several fields moved from flat
//! tier-keyed shapes to dual-mode `{onetime, retainer}` shapes, and old
//! records may still carry the legacy shape or lack a field entirely. The
//! audited fields are therefore kept as raw JSON values and shape-checked by
//! the rule table rather than deserialized into rigid structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Billing mode under which package content can differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One-off project pricing
    Onetime,
    /// Recurring retainer pricing
    Retainer,
}

impl Mode {
    /// Both modes, in canonical order
    pub const ALL: [Mode; 2] = [Mode::Onetime, Mode::Retainer];

    /// Store key for this mode
    pub fn key(&self) -> &'static str {
        match self {
            Mode::Onetime => "onetime",
            Mode::Retainer => "retainer",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Package tier level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Starter,
    Growth,
    Premium,
    Elite,
}

impl Tier {
    /// All four tiers, in display order
    pub const ALL: [Tier; 4] = [Tier::Starter, Tier::Growth, Tier::Premium, Tier::Elite];

    /// Store key for this tier
    pub fn key(&self) -> &'static str {
        match self {
            Tier::Starter => "starter",
            Tier::Growth => "growth",
            Tier::Premium => "premium",
            Tier::Elite => "elite",
        }
    }

    /// Capitalized display name, used as the fallback package name
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Starter => "Starter",
            Tier::Growth => "Growth",
            Tier::Premium => "Premium",
            Tier::Elite => "Elite",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One package-configuration record as stored in the external record store.
///
/// Every audited field is independently nullable or malformed before repair,
/// so they are carried as raw JSON. Unknown store fields are preserved in
/// `extra` and never touched by the audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    /// Record id assigned by the store
    #[serde(rename = "_id")]
    pub id: String,

    /// Display title of the package page (studio/business name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Canonically `{onetime: index, retainer: index}`; legacy records hold a
    /// bare integer or nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular_package_index: Option<Value>,

    /// Canonically mode -> tier -> text; legacy records hold a flat
    /// tier -> text map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Value>,

    /// Canonically mode -> tier -> URL; legacy shape as `descriptions`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_links: Option<Value>,

    /// Canonically mode -> tier -> name; legacy shape as `descriptions`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_names: Option<Value>,

    /// Canonically mode -> ordered list of enabled tier keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_packages: Option<Value>,

    /// Opaque structured payload rendered by the pricing cards; no safe
    /// default exists when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_starter: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_growth: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_premium: Option<Value>,

    /// Store fields the audit does not inspect
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PackageConfig {
    /// Minimal record with the given id; useful for tests and fixtures
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            popular_package_index: None,
            descriptions: None,
            button_links: None,
            package_names: None,
            active_packages: None,
            package_data: None,
            price_starter: None,
            price_growth: None,
            price_premium: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Human-readable label used in fix/issue descriptions
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => format!("{} ({})", title, self.id),
            _ => self.id.clone(),
        }
    }
}

/// Missing-price predicate with the store's JS-era semantics: a price needs
/// attention when it is falsy but not strictly the number zero. An explicit
/// zero is a real price ("free tier"), an absent or null value is not.
pub fn price_is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Number(_)) => false,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Outcome classification of an audit run, derived purely from whether the
/// fix list and issue list are each empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    AllClear,
    HasFixes,
    HasIssues,
    HasBoth,
}

impl ReportStatus {
    /// Derive the status from fix and issue counts
    pub fn from_counts(fix_count: usize, issue_count: usize) -> Self {
        match (fix_count > 0, issue_count > 0) {
            (false, false) => ReportStatus::AllClear,
            (true, false) => ReportStatus::HasFixes,
            (false, true) => ReportStatus::HasIssues,
            (true, true) => ReportStatus::HasBoth,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::AllClear => write!(f, "all_clear"),
            ReportStatus::HasFixes => write!(f, "has_fixes"),
            ReportStatus::HasIssues => write!(f, "has_issues"),
            ReportStatus::HasBoth => write!(f, "has_both"),
        }
    }
}

/// Immutable record of one audit run. Created by the engine, persisted to the
/// store's report collection, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Store-assigned id; absent until persisted
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// When the run started
    pub run_at: DateTime<Utc>,

    /// Number of records scanned
    pub total_packages: usize,

    /// Number of records that received at least one automatic fix
    pub auto_fixed: usize,

    /// Number of flagged issues requiring manual review
    pub needs_attention: usize,

    /// One line per applied fix, in record iteration order
    pub fixes: Vec<String>,

    /// One line per flagged issue, in record iteration order
    pub issues: Vec<String>,

    /// Rendered human-readable summary
    pub summary: String,

    pub status: ReportStatus,
}

impl HealthReport {
    /// Build a report from the accumulated results of one run
    pub fn from_run(
        run_at: DateTime<Utc>,
        total_packages: usize,
        auto_fixed: usize,
        fixes: Vec<String>,
        issues: Vec<String>,
    ) -> Self {
        let status = ReportStatus::from_counts(fixes.len(), issues.len());
        let summary = Self::render_summary(run_at, total_packages, auto_fixed, &fixes, &issues, status);
        Self {
            id: None,
            run_at,
            total_packages,
            auto_fixed,
            needs_attention: issues.len(),
            fixes,
            issues,
            summary,
            status,
        }
    }

    fn render_summary(
        run_at: DateTime<Utc>,
        total: usize,
        auto_fixed: usize,
        fixes: &[String],
        issues: &[String],
        status: ReportStatus,
    ) -> String {
        let mut lines = vec![
            format!("Package health check - {}", run_at.to_rfc3339()),
            format!("Scanned {} package configuration(s).", total),
            format!(
                "Applied {} automatic fix(es) across {} record(s).",
                fixes.len(),
                auto_fixed
            ),
            format!("Flagged {} issue(s) for manual review.", issues.len()),
        ];
        if !fixes.is_empty() {
            lines.push("Fixes:".to_string());
            for fix in fixes {
                lines.push(format!("  - {}", fix));
            }
        }
        if !issues.is_empty() {
            lines.push("Issues:".to_string());
            for issue in issues {
                lines.push(format!("  - {}", issue));
            }
        }
        lines.push(format!("Status: {}", status));
        lines.join("\n")
    }
}

//! Output formatting for CLI audit results
//!
//! Table output is for humans running the audit by hand; JSON and YAML feed
//! the cron wrapper and dashboards.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::model::{HealthReport, ReportStatus};

/// Output format options
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table with colors
    #[default]
    Table,
    /// JSON for machine processing
    Json,
    /// YAML for configuration-style output
    Yaml,
}

/// Audit output structure for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOutput {
    /// When the run started (ISO 8601)
    pub run_at: String,
    pub total_packages: usize,
    pub auto_fixed: usize,
    pub needs_attention: usize,
    pub fixes: Vec<String>,
    pub issues: Vec<String>,
    pub status: ReportStatus,
    pub report: String,
}

impl AuditOutput {
    /// Create output from a health report
    pub fn from_report(report: &HealthReport) -> Self {
        Self {
            run_at: report.run_at.to_rfc3339(),
            total_packages: report.total_packages,
            auto_fixed: report.auto_fixed,
            needs_attention: report.needs_attention,
            fixes: report.fixes.clone(),
            issues: report.issues.clone(),
            status: report.status,
            report: report.summary.clone(),
        }
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => self.render_json(),
            OutputFormat::Yaml => self.render_yaml(),
            OutputFormat::Table => {
                self.render_table();
                Ok(())
            }
        }
    }

    fn render_json(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::internal(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }

    fn render_yaml(&self) -> Result<()> {
        let yaml =
            serde_yaml::to_string(self).map_err(|e| AuditError::internal(e.to_string()))?;
        println!("{}", yaml);
        Ok(())
    }

    fn render_table(&self) {
        let status = match self.status {
            ReportStatus::AllClear => "all clear".green().bold(),
            ReportStatus::HasFixes => "fixes applied".green(),
            ReportStatus::HasIssues => "needs attention".yellow().bold(),
            ReportStatus::HasBoth => "fixed + needs attention".yellow().bold(),
        };

        println!("{}", "Package health audit".bold());
        println!("  run at:          {}", self.run_at);
        println!("  packages:        {}", self.total_packages);
        println!("  auto-fixed:      {}", self.auto_fixed);
        println!("  needs attention: {}", self.needs_attention);
        println!("  status:          {}", status);

        if !self.fixes.is_empty() {
            println!("\n{}", "Fixes".green().bold());
            for fix in &self.fixes {
                println!("  {} {}", "✔".green(), fix);
            }
        }

        if !self.issues.is_empty() {
            println!("\n{}", "Issues".yellow().bold());
            for issue in &self.issues {
                println!("  {} {}", "!".yellow(), issue);
            }
        }
    }
}

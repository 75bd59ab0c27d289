//! CLI module for the Package Health Agent
//!
//! `run` executes one audit against the configured record store (the shape
//! the daily cron job uses); `serve` starts the HTTP surface for dashboard
//! triggering.

pub mod commands;
pub mod output;

pub use commands::{AuditCli, AuditCommands};
pub use output::{AuditOutput, OutputFormat};

use crate::error::AuditError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Audit completed with nothing needing attention (fixes included)
    Success = 0,
    /// Audit completed but issues need manual review
    IssuesFound = 1,
    /// Caller lacks the admin role
    Forbidden = 3,
    /// Record store unavailable or rejected a request
    StoreError = 4,
    /// Invalid configuration or arguments
    ConfigError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Exit code for a completed run: issues drive the code, fixes do not
    pub fn from_report_issues(issue_count: usize) -> Self {
        if issue_count > 0 {
            ExitCode::IssuesFound
        } else {
            ExitCode::Success
        }
    }

    /// Exit code for a failed run
    pub fn from_error(err: &AuditError) -> Self {
        match err {
            AuditError::Forbidden { .. } => ExitCode::Forbidden,
            AuditError::Store(_) => ExitCode::StoreError,
            AuditError::Config(_) => ExitCode::ConfigError,
            AuditError::Internal(_) => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub async fn run(cli: AuditCli) -> Result<ExitCode, AuditError> {
    match cli.command {
        AuditCommands::Run {
            store_url,
            api_key,
            caller,
            role,
            format,
        } => commands::execute_run(cli.config, store_url, api_key, caller, role, format).await,
        AuditCommands::Serve {
            store_url,
            api_key,
            bind,
        } => commands::execute_serve(cli.config, store_url, api_key, bind).await,
    }
}

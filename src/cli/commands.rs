//! CLI command definitions
//!
//! Clap-based definitions for running one-shot audits and serving the HTTP
//! surface. Flags override environment variables, which override the config
//! file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use super::output::{AuditOutput, OutputFormat};
use super::ExitCode;
use crate::auth::{CallerIdentity, CallerRole};
use crate::client::HttpRecordStore;
use crate::config::AppConfig;
use crate::engine::SchemaAuditor;
use crate::error::{AuditError, Result};
use crate::handler::{create_router, AppState};
use crate::telemetry::AuditMetricsRegistry;

/// Package Health Agent CLI
///
/// Audit package-configuration records for schema drift, repair what can be
/// repaired, and report what needs a human.
#[derive(Parser, Debug)]
#[command(name = "package-audit")]
#[command(about = "Package Health Agent - audit and repair package configurations", long_about = None)]
#[command(version)]
pub struct AuditCli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: AuditCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum AuditCommands {
    /// Run one audit and print the report
    ///
    /// Exits 0 when nothing needs attention (automatic fixes included),
    /// 1 when issues need manual review.
    Run {
        /// Record store base URL (overrides config/env)
        #[arg(long, env = "PACKAGE_HEALTH_STORE_URL")]
        store_url: Option<String>,

        /// Record store API key
        #[arg(long, env = "PACKAGE_HEALTH_STORE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Caller subject recorded in logs
        #[arg(long, default_value = "cli")]
        caller: String,

        /// Caller role; the audit requires admin
        #[arg(long, default_value = "admin")]
        role: CallerRoleArg,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Serve the HTTP audit endpoint
    Serve {
        /// Record store base URL (overrides config/env)
        #[arg(long, env = "PACKAGE_HEALTH_STORE_URL")]
        store_url: Option<String>,

        /// Record store API key
        #[arg(long, env = "PACKAGE_HEALTH_STORE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Address to bind, e.g. 0.0.0.0:8080
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Clap-friendly wrapper around `CallerRole`
#[derive(Copy, Clone, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum CallerRoleArg {
    Admin,
    Member,
    Anonymous,
}

impl From<CallerRoleArg> for CallerRole {
    fn from(arg: CallerRoleArg) -> Self {
        match arg {
            CallerRoleArg::Admin => CallerRole::Admin,
            CallerRoleArg::Member => CallerRole::Member,
            CallerRoleArg::Anonymous => CallerRole::Anonymous,
        }
    }
}

fn build_store(
    config_path: Option<PathBuf>,
    store_url: Option<String>,
    api_key: Option<String>,
) -> Result<(AppConfig, HttpRecordStore)> {
    let mut config = AppConfig::load(config_path.as_deref())?;
    if let Some(url) = store_url {
        config.store.base_url = url;
    }
    if let Some(key) = api_key {
        config.store.api_key = Some(key);
    }

    let store = HttpRecordStore::with_config(config.store.clone().into());
    Ok((config, store))
}

/// Execute the `run` command
pub async fn execute_run(
    config_path: Option<PathBuf>,
    store_url: Option<String>,
    api_key: Option<String>,
    caller: String,
    role: CallerRoleArg,
    format: OutputFormat,
) -> Result<ExitCode> {
    let (_, store) = build_store(config_path, store_url, api_key)?;
    let auditor = SchemaAuditor::new(Arc::new(store));
    let identity = CallerIdentity::new(caller, role.into());

    let report = auditor.run_audit(&identity).await?;
    let output = AuditOutput::from_report(&report);
    output.render(format)?;

    Ok(ExitCode::from_report_issues(report.issues.len()))
}

/// Execute the `serve` command
pub async fn execute_serve(
    config_path: Option<PathBuf>,
    store_url: Option<String>,
    api_key: Option<String>,
    bind: Option<String>,
) -> Result<ExitCode> {
    let (mut config, store) = build_store(config_path, store_url, api_key)?;
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }

    let metrics = Arc::new(
        AuditMetricsRegistry::new()
            .map_err(|e| AuditError::internal(format!("metrics init failed: {}", e)))?,
    );
    let state = AppState::new(Arc::new(store), metrics);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .map_err(|e| {
            AuditError::config(format!("cannot bind {}: {}", config.server.bind_addr, e))
        })?;

    tracing::info!(addr = %config.server.bind_addr, "Package Health Agent listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| AuditError::internal(e.to_string()))?;

    Ok(ExitCode::Success)
}

//! Package Health Agent CLI
//!
//! # Usage
//!
//! ```bash
//! # Run one audit from cron and print the report
//! package-audit run --store-url https://records.internal --format json
//!
//! # Serve the HTTP audit endpoint for the admin dashboard
//! package-audit serve --bind 0.0.0.0:8080
//! ```
//!
//! # Exit Codes
//!
//! - 0: Audit completed, nothing needs attention
//! - 1: Audit completed, issues need manual review
//! - 3: Caller lacks the admin role
//! - 4: Record store unavailable
//! - 5: Invalid configuration or arguments
//! - 10: Internal error

use clap::Parser;
use package_health::{run_cli, AuditCli};

#[tokio::main]
async fn main() {
    let cli = AuditCli::parse();

    // Verbosity flags raise the default level; RUST_LOG still wins
    let default_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}

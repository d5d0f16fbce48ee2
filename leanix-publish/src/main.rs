use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use leanix_publish::{exit_code_for, run, Cli};
use leanix_publish_core::publish::SbomOutcome;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the final summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(report) => {
            println!(
                "Published {} to fact sheet {}",
                report.manifest.name, report.fact_sheet_id
            );
            match &report.sbom {
                SbomOutcome::Registered(sbom) => println!("Registered SBOM {}", sbom.name),
                SbomOutcome::Skipped { path } => {
                    println!("No SBOM registered ({} not found)", path.display())
                }
            }
            tracing::info!("CLI completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            eprintln!("[ERROR] Publish failed: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

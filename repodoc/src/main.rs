use clap::Parser;
use repodoc::cli::{run, Cli};
use repodoc_core::notify::Notification;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout is reserved for the generated document.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    tracing::info!("CLI arguments parsed, invoking run");

    // Panics inside the command surface here instead of vanishing.
    match tokio::spawn(run(cli)).await {
        Ok(Ok(())) => {
            tracing::info!("CLI completed successfully");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "CLI exited with error");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Command task failed unexpectedly");
            eprintln!("{}", Notification::unexpected());
            ExitCode::FAILURE
        }
    }
}

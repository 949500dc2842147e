//! CLI glue for repodoc: command parsing, wiring of the concrete clients and
//! the top-level action handler.
//!
//! All business logic lives in `repodoc-core`. This module is the single place
//! where an error becomes a user-visible [`Notification`]; stdout carries only
//! command output (the generated document, the status line), notifications go
//! to stderr.
use crate::load_config::load_config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use repodoc_core::completion::OpenAiClient;
use repodoc_core::config::Config;
use repodoc_core::github::GitHubClient;
use repodoc_core::identity::FileIdentityStore;
use repodoc_core::notify::Notification;
use repodoc_core::workflow::RepoDoc;
use repodoc_core::RepoDocError;
use std::path::PathBuf;

type App = RepoDoc<GitHubClient, OpenAiClient, FileIdentityStore>;

/// CLI for repodoc: write a README for a GitHub repository from its sources.
#[derive(Parser)]
#[clap(
    name = "repodoc",
    version,
    about = "Connect to a GitHub repository and generate README documentation from its sources"
)]
pub struct Cli {
    /// Path to an optional YAML config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that a repository exists and remember it for `generate`
    Connect {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
    },
    /// Generate documentation for the connected repository
    Generate {
        /// Write the markdown to this file instead of stdout
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
    /// Show the connected repository
    Status,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            notify(&Notification::error(format!("{e:#}")));
            return Err(e);
        }
    };
    let app = build_app(&config).map_err(fail)?;

    match cli.command {
        Commands::Connect { url } => {
            tracing::info!(command = "connect", %url, "Connecting");
            let identity = app.connect(&url).await.map_err(fail)?;
            notify(&Notification::success(format!("Connected to {identity}")));
        }
        Commands::Generate { output } => {
            tracing::info!(command = "generate", "Generating documentation");
            let document = app.generate().await.map_err(fail)?;
            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, document.as_str()) {
                        let e = RepoDocError::Storage(format!("{}: {e}", path.display()));
                        return Err(fail(e));
                    }
                    notify(&Notification::success(format!(
                        "Documentation written to {}",
                        path.display()
                    )));
                }
                None => {
                    println!("{document}");
                    notify(&Notification::success("Documentation generated"));
                }
            }
        }
        Commands::Status => match app.connected().map_err(fail)? {
            Some(identity) => println!("{identity}"),
            None => println!("No repository connected"),
        },
    }
    Ok(())
}

fn build_app(config: &Config) -> repodoc_core::Result<App> {
    config.require_credentials()?;
    Ok(RepoDoc::new(
        GitHubClient::new(&config.github)?,
        OpenAiClient::new(&config.completion)?,
        FileIdentityStore::new(&config.storage.identity_path),
        config.selector.clone(),
    ))
}

/// Top-level handler: one notification per failed action.
fn fail(error: RepoDocError) -> anyhow::Error {
    tracing::error!(kind = error.kind(), error = %error, "Action failed");
    notify(&Notification::from(&error));
    error.into()
}

fn notify(notification: &Notification) {
    eprintln!("{notification}");
}

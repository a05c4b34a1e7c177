mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use client::{make_token_store, ReportManager, SessionStore, Settings};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::App;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let mut settings = Settings::new()?;
    if let Some(base_url) = args.base_url {
        settings.api.base_url = base_url;
    }
    tracing::debug!(base_url = %settings.api.base_url, "settings loaded");

    let backend = settings.backend()?;
    let session = SessionStore::new(backend.clone(), make_token_store(&settings));
    let mut app = App::new(session, ReportManager::new(backend));
    app.run(args.cmd).await
}

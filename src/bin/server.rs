use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use docgpt::server::state::AppState;
use docgpt::server::Server;
use docgpt::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("docgpt=info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("failed to load configuration")?;

    let state = AppState::new(config)
        .await
        .context("failed to initialize application state")?;

    Server::new(state).start().await?;
    Ok(())
}

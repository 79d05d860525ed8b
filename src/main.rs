use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use hrm_portal::auth::{SessionContext, SessionStore};
use hrm_portal::cli::{self, Cli};
use hrm_portal::{ApiClient, Config};

use tracing::{error, info};
use tracing_appender::rolling;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env().context("invalid configuration")?;

    // Rolling daily log; the terminal is left for command output
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(base_url = %config.api_base_url, "Portal client starting...");

    let session = SessionContext::persistent(SessionStore::new(&config.session_file))
        .with_context(|| format!("failed to load session from {}", config.session_file.display()))?;
    let client = ApiClient::new(&config, session).context("failed to build HTTP client")?;

    if let Err(e) = cli::run(cli, &client).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }
    Ok(())
}

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vecstat_web::{router, AppState, ServerConfig, ServerError};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config));
    let app = router(state, config.public_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, upstream = %config.fetch.endpoint, "vecstat-web listening");
    axum::serve(listener, app).await?;
    Ok(())
}

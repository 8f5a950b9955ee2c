//! Server binary: load config from the environment, wire up logging, run.

use duomatch::{ServerBuilder, ServerConfig, ServerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let server = ServerBuilder::new()
        .bind(&config.bind_addr)
        .match_config(config.match_config())
        .build()
        .await?;

    tracing::info!(addr = %config.bind_addr, "duomatch listening");
    server.run().await
}

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use ads_chat_backend::api;
use ads_chat_backend::config::Config;
use ads_chat_backend::services::database::PostgresDatabase;
use ads_chat_backend::services::{GeminiProvider, QuestionPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Using model {} at {}", config.llm.model, config.llm.base_url);
    if config.sql.strict_validation {
        info!("Strict SQL validation enabled");
    }

    let llm = Arc::new(GeminiProvider::new(&config.llm));
    let database = Arc::new(PostgresDatabase::new(config.database.clone()));
    let pipeline = Arc::new(QuestionPipeline::new(
        llm,
        database,
        config.sql.strict_validation,
    ));

    // Create router with state
    let app: Router = api::routes::create_router_with_state(pipeline);

    // Start server
    let addr: SocketAddr = config.server_address().parse().map_err(|e| {
        error!("Invalid server address {}: {}", config.server_address(), e);
        e
    })?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

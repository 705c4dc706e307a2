use anyhow::Context;
use micro_gateway::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app_config::{AppConfig, Server};
use app_error::AppError;
use micro_gateway::schema::create_schema;
use micro_gateway::service::GatewayService;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load the gateway configuration
    let config = AppConfig::load()?;

    // Initialize the logger; RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.monitoring.logging.level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.monitoring.logging.format.as_str() {
        "compact" => builder.compact().init(),
        _ => builder.init(),
    }

    info!(environment = %config.environment, "Starting mock gateway");

    // Assemble the schema once; construction failures abort startup
    let schema = create_schema(&config)?;
    let service = Arc::new(GatewayService::new(schema));

    // Configure application routes
    let app = routes::create_routes(service, &config);

    // Bind server to address and start it
    let server = Server::from(&config);
    server.validate()?;
    let address = format!("{}:{}", server.address, server.port);
    let listener = TcpListener::bind(&address)
        .await
        .context(format!("Failed to bind to address: {}", address))?;

    if config.gateway.playground {
        info!("GraphQL playground available at: http://{}", address);
    }

    // Start server with graceful error handling
    info!("Server starting");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::Context;
use server::config::Config;
use server::service::TaskService;
use server::{database, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting up the server...");

    let config = Config::from_env()?;

    let db_pool =
        match database::establish_connection_pool(&config.database_url, config.max_connections)
            .await
        {
            Ok(pool) => {
                tracing::info!("Database connection was made successfully.");
                pool
            }
            Err(e) => {
                tracing::error!("Failed to connect with the database: {:?}", e);
                std::process::exit(1);
            }
        };

    let service = TaskService::new(db_pool);

    // Configure CORS here, applying it globally to the router
    let app = routes::create_router(service).layer(routes::cors_layer(&config.allowed_origins));

    let addr = config.addr();
    tracing::info!("The server listens on http://{}", addr);
    tracing::info!("Frontend should connect to: http://{}/api", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}

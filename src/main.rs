// Blog API Server - authors, pages and comments over SQLite

use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use blog_api::{
    app_state::AppState, config::Config, controllers::create_router,
    data_seeder::load_product_fixtures,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blog_api=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(config.clone()).await?;

    if config.api.seed_fixtures {
        load_product_fixtures(app_state.database.clone()).await?;
    }

    let app = create_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server_address();
    info!("Blog API listening on http://{}", addr);
    info!("  GET|POST            /v1/authors, /v1/pages");
    info!("  GET|PUT|PATCH|DELETE /v1/authors/{{id}}, /v1/pages/{{id}}");
    info!("  GET|POST            /v1/pages/{{id}}/comments");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::config::ServerConfig;
use transit_server::service::TransitService;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");

    let service = TransitService::new(config.tree_cache);

    // Preload a dataset if one was configured (fail fast if it is unusable)
    if let Some(path) = &config.data_path {
        info!(path = %path.display(), "loading dataset");
        service
            .load_from_path(path)
            .await
            .expect("Failed to load dataset");
    }

    let app = create_router(AppState::new(service));

    let addr = config.socket_addr();
    info!(%addr, "transit server listening");
    info!("endpoints: GET /health, POST /load, POST /query, PUT /stop, PUT /bus, PATCH /patch");
    info!("lookups: GET /stops/:name, GET /buses/:name, GET /route?from=&to=");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}

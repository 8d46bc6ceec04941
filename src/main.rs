use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typerace::{
    AppState, ConnectionManager, InMemoryConnectionManager, InMemoryRoomRegistry, RoomService,
    ServerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typerace=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");
    info!(
        bind_addr = %config.bind_addr,
        text_source = %config.text_source,
        "Starting typing race server"
    );

    // Room registry is owned here and injected into the service
    let connection_manager: Arc<dyn ConnectionManager> = Arc::new(InMemoryConnectionManager::new());
    let registry = Arc::new(InMemoryRoomRegistry::new(
        connection_manager.clone(),
        config.text_supplier(),
    ));
    let room_service = Arc::new(RoomService::new(registry));
    let app_state = AppState::new(room_service, connection_manager);

    let app = typerace::app(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.expect("Server error");
}

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voyago_api::{app, auth::hash_password, state::AuthConfig, AppState};
use voyago_store::MemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyago_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = voyago_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Voyago API on port {}", config.server.port);

    let store = Arc::new(MemoryStore::new());

    // Operator bootstrap, replacing the reference system's superuser step
    store
        .register_user(
            &config.admin.username,
            None,
            hash_password(&config.admin.password),
            true,
        )
        .await
        .expect("Failed to create bootstrap admin");

    let app_state = AppState::new(
        store,
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}

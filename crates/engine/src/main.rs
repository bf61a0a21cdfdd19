//! Gauniv Engine - Main entry point.

use std::path::Path;
use std::sync::Arc;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gauniv_domain::{UserAccount, UserId, UserName};
use gauniv_engine::api;
use gauniv_engine::infrastructure::clock::SystemClock;
use gauniv_engine::infrastructure::config::{load_dotenv_from, EngineConfig};
use gauniv_engine::infrastructure::persistence::SqliteFriendStore;
use gauniv_engine::infrastructure::ports::UserRepo;
use gauniv_engine::app::{shutdown_on, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine is usually run from `crates/engine`).
    load_dotenv_from(&Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(".."));

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gauniv_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gauniv Engine");

    let config = EngineConfig::from_env()?;
    tracing::info!(
        database = %config.database_path.display(),
        notify_policy = ?config.notify_policy,
        "Configuration loaded"
    );

    let store = Arc::new(SqliteFriendStore::new(&config.database_path.to_string_lossy()).await?);
    seed_users(store.as_ref(), &config.seed_users).await?;

    let app = Arc::new(App::new(
        store.clone(),
        store,
        Arc::new(SystemClock::new()),
        config.notify_policy,
    ));

    let mut router = api::router(app.clone());
    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_on(app, tokio::signal::ctrl_c()))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Create an account for each name that does not resolve yet. The name doubles
/// as the id, which keeps local testing with `x-user-id` readable.
async fn seed_users(users: &dyn UserRepo, names: &[String]) -> anyhow::Result<()> {
    for name in names {
        if users.find_by_username(name).await?.is_some() {
            continue;
        }
        let account = UserAccount::new(UserId::new(name.as_str())?, UserName::new(name.as_str())?);
        users.save(&account).await?;
        tracing::info!(user = %name, "Seeded user");
    }
    Ok(())
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // The storefront sends X-User-Id, which triggers CORS preflights.
        .allow_headers([
            HeaderName::from_static("x-user-id"),
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}

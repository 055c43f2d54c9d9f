//! LumiRead backend server.
//!
//! Wires the Postgres store, local media store, and JWT auth into the
//! service engines and serves the full HTTP surface until a shutdown
//! signal arrives.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{build_router, metrics::HttpMetrics, AppState};
use auth_adapters::{Argon2CredentialHasher, JwtTokenIssuer};
use configs::Settings;
use secrecy::ExposeSecret;
use services::{
    AccountService, CatalogService, FeedService, MembershipService, ReviewService, ShelfService,
};
use storage_adapters::{LocalMediaStore, PgStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    init_tracing(&settings);

    let store = Arc::new(
        PgStore::connect(
            settings.database.url.expose_secret(),
            settings.database.max_connections,
        )
        .await
        .context("connecting to postgres")?,
    );
    let media = Arc::new(LocalMediaStore::new(
        settings.media.root_dir.clone().into(),
        settings.media.url_prefix.clone(),
    ));
    let hasher = Arc::new(Argon2CredentialHasher::new());
    let tokens = Arc::new(JwtTokenIssuer::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        settings.auth.token_ttl_hours,
    ));

    let state = AppState {
        accounts: AccountService::new(store.clone(), hasher, tokens.clone()),
        membership: MembershipService::new(store.clone(), store.clone()),
        feed: FeedService::new(store.clone(), store.clone(), store.clone(), media),
        reviews: ReviewService::new(store.clone(), store.clone()),
        catalog: CatalogService::new(store.clone()),
        shelf: ShelfService::new(store.clone(), store.clone()),
        users: store.clone(),
        tokens,
        metrics: Arc::new(HttpMetrics::new()),
    };

    let router = build_router(state, &settings);
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "LumiRead backend running");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    // RUST_LOG wins over the configured filter when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.filter.clone()));

    if settings.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

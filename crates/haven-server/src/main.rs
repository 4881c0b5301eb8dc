mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use haven_geocode::{GeocoderStack, GeocodioClient, MapboxClient};
use haven_resolve::{
    FileDirectory, MemoryTtlStore, RateLimiter, ResolvedResponse, ResolverService,
};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = haven_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let directory = FileDirectory::load(&config.directory_path)?;
    tracing::info!(
        records = directory.record_count(),
        path = %config.directory_path.display(),
        "loaded resource directory"
    );

    let primary = config
        .mapbox_access_token
        .as_deref()
        .map(|token| MapboxClient::new(token, config.geocode_timeout_secs))
        .transpose()?;
    let secondary = config
        .geocodio_api_key
        .as_deref()
        .map(|key| GeocodioClient::new(key, config.geocode_timeout_secs))
        .transpose()?;
    if primary.is_none() && secondary.is_none() {
        tracing::warn!(
            "no geocoding credentials configured; every lookup will degrade to national-only results"
        );
    }

    let geocoder = GeocoderStack::new(
        primary,
        secondary,
        Duration::from_secs(config.geocode_timeout_secs),
        Duration::from_millis(config.geocode_retry_backoff_ms),
    );
    let service = ResolverService::new(
        Arc::new(directory),
        geocoder,
        Arc::new(MemoryTtlStore::<ResolvedResponse>::new()),
        Duration::from_secs(config.cache_ttl_secs),
        Duration::from_secs(config.degraded_cache_ttl_secs),
    );
    let limiter = RateLimiter::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );

    let app = build_app(
        AppState {
            service: Arc::new(service),
        },
        limiter,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

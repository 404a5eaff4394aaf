use anyhow::anyhow;
use axum::Router;
use std::future::IntoFuture;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taleem_bridge::config::AppConfig;
use taleem_bridge::infra::{cache::RedisCache, channel::PushChannel, store::LayoutStore};
use taleem_bridge::{http, jobs, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Redis backs the layout store and the push list; a memory-store
    // api deployment needs neither.
    let needs_redis = config.layout_store == "redis" || config.app_mode == "bridge";
    let cache = if needs_redis {
        Some(RedisCache::connect(&config.redis_url).await?)
    } else {
        None
    };

    let store = match config.layout_store.as_str() {
        "memory" => LayoutStore::memory(),
        "redis" => {
            let cache = cache
                .clone()
                .ok_or_else(|| anyhow!("redis connection required for LAYOUT_STORE=redis"))?;
            LayoutStore::redis(cache)
        }
        other => return Err(anyhow!("unknown LAYOUT_STORE: {}", other)),
    };

    let state = AppState::new(
        store,
        config.app_origin.clone(),
        Duration::from_millis(config.delivery_timeout_ms),
        config.bridge_token.clone(),
    );

    let app: Router = http::router(state.clone()).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("listening on {}", config.http_addr);

    match config.app_mode.as_str() {
        "api" => {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        "bridge" => {
            let cache = cache.ok_or_else(|| anyhow!("redis connection required in bridge mode"))?;
            let channel = PushChannel::new(cache, config.push_list_key.clone());
            tracing::info!(list = %channel.list_key(), "starting bridge mode");

            let server = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .into_future();
            tokio::select! {
                result = server => result?,
                result = jobs::push_consumer::run(channel, state.bridge.clone(), config.push_poll_seconds) => {
                    result?;
                }
            }
        }
        other => return Err(anyhow!("unknown APP_MODE: {}", other)),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

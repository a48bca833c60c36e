//! Service startup: pool, cache, background workers, and the Axum server.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::email_worker::run_email_worker;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::email::EmailSender;
use crate::infrastructure::persistence::{PgUrlRepository, PgUserRepository};
use crate::routes::create_router;
use crate::state::AppState;

/// Capacity of the outbound email queue. A full queue drops the message
/// with a warning rather than blocking the request.
const EMAIL_QUEUE_CAPACITY: usize = 256;

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);
    init_tracing(&config);
    config.log_summary();

    let pool = Arc::new(
        PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
            .context("failed to connect to PostgreSQL")?,
    );

    sqlx::migrate!("./migrations")
        .run(pool.as_ref())
        .await
        .context("failed to run database migrations")?;
    info!("database migrations applied");

    let cache: Arc<dyn CacheService> = match &config.redis_url {
        Some(redis_url) => match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                info!("connected to Redis");
                Arc::new(redis)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Redis unavailable; redirects fall back to the database and registration staging is disabled"
                );
                Arc::new(NullCache)
            }
        },
        None => {
            info!("caching disabled");
            Arc::new(NullCache)
        }
    };

    let (email_tx, email_rx) = mpsc::channel(EMAIL_QUEUE_CAPACITY);
    let email_sender = config
        .email
        .as_ref()
        .map(|e| EmailSender::new(e.api_url.clone(), e.api_key.clone(), e.from.clone()));
    tokio::spawn(run_email_worker(email_rx, email_sender));

    let state = AppState::new(
        Arc::clone(&config),
        Arc::new(PgUrlRepository::new(Arc::clone(&pool))),
        Arc::new(PgUserRepository::new(pool)),
        cache,
        email_tx,
    );

    let router = create_router(state);
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down cleanly");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if config.log_json {
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
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
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

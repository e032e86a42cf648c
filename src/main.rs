//! `carpenter` server binary.
//!
//! Loads configuration, installs logging, connects to `PostgreSQL`, and
//! serves the board API until Ctrl-C or `SIGTERM`.

use std::sync::Arc;

use anyhow::{Context, Result};
use carpenter::{
    activity::adapters::postgres::PostgresActivityLog,
    api::{self, AppState},
    db,
    order::adapters::postgres::PostgresOrderDirectory,
    settings::Settings,
    task::adapters::postgres::PostgresTaskRepository,
    telemetry,
};
use mockable::DefaultClock;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("load configuration")?;
    telemetry::init(&settings.logging).context("initialise telemetry")?;

    let state = connect(&settings).await?;
    let cors = api::cors_layer(settings.server.cors_origin.as_deref())?;
    let app = api::router(state, cors);

    let addr = settings.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, "carpenter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;
    tracing::info!("carpenter stopped");
    Ok(())
}

async fn connect(settings: &Settings) -> Result<AppState<DefaultClock>> {
    let url = settings
        .database
        .url
        .as_deref()
        .context("DATABASE_URL (or CARPENTER__DATABASE__URL) must be set")?;
    let pool = db::build_pool(url, settings.database.max_connections)
        .context("connect to PostgreSQL")?;
    if settings.database.auto_migrate {
        db::apply_schema(&pool).await.context("apply schema")?;
    }

    Ok(AppState::new(
        Arc::new(PostgresTaskRepository::new(pool.clone())),
        Arc::new(PostgresOrderDirectory::new(pool.clone())),
        Arc::new(PostgresActivityLog::new(pool)),
        Arc::new(DefaultClock),
        settings.lifecycle.conflict_attempts,
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

//! `baja-api`: the instrument catalog HTTP server.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use baja_api::config::ServerConfig;
use baja_api::router::build_app_router;
use baja_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = baja_db::create_pool(&database_url)
        .await
        .context("Failed to connect to the catalog database")?;
    baja_db::run_migrations(&pool)
        .await
        .context("Failed to apply catalog migrations")?;
    tracing::info!("Catalog database ready");

    tokio::fs::create_dir_all(&config.media.root)
        .await
        .with_context(|| format!("Cannot create MEDIA_ROOT {}", config.media.root.display()))?;
    tracing::info!(
        root = %config.media.root.display(),
        url = %config.media.url_prefix,
        served_locally = config.media.mount_path().is_some(),
        max_upload_bytes = config.media.max_upload_bytes,
        "Media storage ready",
    );

    let addr = SocketAddr::new(
        config.host.parse().context("HOST is not an IP address")?,
        config.port,
    );
    let app = build_app_router(AppState::new(pool, config.clone()), &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot listen on {addr}"))?;
    tracing::info!(
        %addr,
        allowed_hosts = ?config.allowed_hosts,
        cors_origins = ?config.cors_origins,
        "Catalog API listening",
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Catalog API stopped");
    Ok(())
}

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "baja_api=debug,baja_db=info,tower_http=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Draining connections before shutdown");
}

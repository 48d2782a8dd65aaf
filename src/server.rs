//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, safety oracle, token and session services,
//! and the Axum server lifecycle.

use crate::application::services::{SessionService, TokenService};
use crate::config::Config;
use crate::infrastructure::persistence::{connect, run_migrations};
use crate::infrastructure::safety::init_oracle;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Safety oracle (or the null oracle fallback)
/// - Token and session services
/// - Axum HTTP server, plain or TLS
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - Safety screening is required but cannot be enabled
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect(&config.database_url, &config.pool_settings()).await?;
    tracing::info!("Connected to database");

    run_migrations(&pool).await?;

    let oracle = init_oracle(&config.safety_settings())
        .context("Failed to initialize Safe Browsing")?;
    tracing::info!(mode = %oracle.mode(), "Safety oracle ready");

    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl(),
        config.token_grace(),
    ));

    let sessions = Arc::new(SessionService::new(
        config.session_secret.as_bytes(),
        config.session_ttl(),
        config.session_cookie_secure,
    ));

    let state = AppState::new(Arc::new(pool), tokens, sessions, oracle, &config.base_url);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;

    if let Some((cert, key)) = config.tls_paths() {
        return serve_tls(app, addr, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(
    app: tower_http::normalize_path::NormalizePath<axum::Router>,
    addr: SocketAddr,
    cert: &std::path::Path,
    key: &std::path::Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| format!("Failed to load TLS certificate {}", cert.display()))?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
    });

    tracing::info!("Listening on https://{addr}");

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(
    _app: tower_http::normalize_path::NormalizePath<axum::Router>,
    _addr: SocketAddr,
    _cert: &std::path::Path,
    _key: &std::path::Path,
) -> Result<()> {
    anyhow::bail!("TLS requested but the binary was built without the 'tls' feature")
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

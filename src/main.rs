/// HubSpot CRM middleware
///
/// - `/auth/hubspot*`: OAuth2 authorization code flow, token info, refresh
/// - `/tools*`: CRM tool handlers (search, get, create, update, associations)
/// - `/health`, `/status`: liveness and configuration overview

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use hubspot_crm_middleware::config::Settings;
use hubspot_crm_middleware::utils::{logging::*, AppError};
use hubspot_crm_middleware::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; in production variables come from the environment
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        log_info("✅ .env file loaded");
    }

    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let port = settings.server.port;

    let app_state = Arc::new(AppState::from_settings(settings)?);
    let app = build_router(app_state);

    log_server_startup(port);
    let listener = TcpListener::bind(&addr).await?;
    log_server_ready(&addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Failed to install Ctrl+C handler: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("Failed to install SIGTERM handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}

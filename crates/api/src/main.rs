//! Hookcast server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hookcast_common::config::AppConfig;
use hookcast_notifier::{ReqwestSender, WebhookNotifier};

use hookcast_api::routes::create_router;
use hookcast_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("hookcast_api=info,hookcast_notifier=info,tower_http=debug")
    });
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting Hookcast...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Build the webhook notifier and start its worker
    let sender = ReqwestSender::new(Duration::from_secs(config.request_timeout_secs))?;
    let notifier = Arc::new(WebhookNotifier::new(Arc::new(sender)));
    if !notifier.activate(config.webhook.clone()).await {
        tracing::warn!(
            "Webhook delivery inactive; set WEBHOOK_ENABLED=true and WEBHOOK_URL to enable it"
        );
    }

    // Build router
    let state = AppState::new(notifier.clone(), config.clone());
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|_| anyhow::anyhow!("LISTEN_ADDR must be a socket address, e.g. 0.0.0.0:3000"))?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    notifier.deactivate().await;
    tracing::info!("Hookcast stopped.");
    Ok(())
}

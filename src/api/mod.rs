//! HTTP JSON API over the [`Ledger`].

pub mod error;
pub mod handlers;

use crate::{errors::Result, service::Ledger};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The ledger every handler calls into
    pub ledger: Arc<Ledger>,
}

/// Builds the application router.
pub fn router(ledger: Arc<Ledger>) -> Router {
    let state = AppState { ledger };

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/api/customers/{id}",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/api/customers/{id}/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route("/api/customers/{id}/stats", get(handlers::customer_stats))
        .route("/api/customers/{id}/profile", get(handlers::customer_profile))
        .route(
            "/api/customers/{id}/summary",
            post(handlers::summarize_customer),
        )
        .route(
            "/api/customers/{id}/highlights",
            post(handlers::highlight_customer),
        )
        .route("/api/summary", post(handlers::summarize_records))
        .route("/api/highlights", post(handlers::highlight_records))
        .route(
            "/api/records/{id}",
            put(handlers::update_record).delete(handlers::delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API on `bind_addr` until Ctrl-C.
pub async fn serve(ledger: Arc<Ledger>, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(ledger))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

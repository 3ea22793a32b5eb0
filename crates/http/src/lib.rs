//! HTTP server facade for the posters API with Axum, bearer auth, error
//! handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};
use posters_auth::JwtVerifier;
use posters_kernel::{settings::Settings, ModuleRegistry};

pub mod auth;
pub mod error;
pub mod openapi;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry and serve until Ctrl-C
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    verifier: JwtVerifier,
) -> anyhow::Result<()> {
    let address = settings.server.bind_address();
    tracing::info!("starting HTTP server on {}", address);

    let app = build_router(registry, settings, verifier);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted under `/api`
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &Settings,
    verifier: JwtVerifier,
) -> Router {
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .with_bearer_auth(verifier)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under /api/{}",
            module.name()
        );
        router_builder = router_builder.mount_module(module.name(), module.routes());
    }

    router_builder.with_openapi(registry).build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

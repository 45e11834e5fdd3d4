//! # Dialdesk
//!
//! Dialdesk logs call outcomes against products. Each product carries a
//! server-defined feedback schema; the browser renders one control per field
//! and posts the values back with the call.
//!
//! ## Features
//!
//! - **Products**: schemas loaded from `dialdesk.toml` and `config/products/`
//! - **Calls**: multipart create/update, validated against the product schema
//! - **Uploads**: feedback files stored through `object_store`
//! - **Health Checks**: health, readiness and liveness endpoints
//! - **Web UI**: the embedded Leptos bundle, served as an SPA
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dialdesk::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     println!("{} products", settings.products.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: products, call records and their ports
//! - **Adapters**: HTTP handlers, the call store, upload storage
//! - **Config**: configuration loading and validation
//!
//! The form model itself lives in the `dialdesk-forms` crate, shared with the UI.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::file_storage::UploadStore;
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::product_catalog::ProductCatalog;
use crate::domain::CallPort;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `settings` - Application settings, products included
/// * `calls` - Call record store
/// * `uploads` - Storage for files attached to call feedback
pub async fn create_app(
    settings: Arc<RwLock<crate::config::Settings>>,
    calls: Arc<dyn CallPort>,
    uploads: Arc<UploadStore>,
) -> Router {
    let health_handler = Arc::new(HealthHandler::new(settings.clone()));
    let body_limit = settings.read().await.uploads.max_body_bytes;

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let api_state = ApiState {
        products: Arc::new(ProductCatalog::new(settings)),
        calls,
        uploads,
    };

    let api_router = Router::new()
        .route("/products", get(api_handler::list_products))
        .route("/products/:id", get(api_handler::get_product))
        .route("/products/:id/fields", put(api_handler::update_product_fields))
        .route(
            "/products/:id/calls",
            get(api_handler::list_calls).post(api_handler::create_call),
        )
        .route(
            "/calls/:id",
            get(api_handler::get_call).patch(api_handler::update_call),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(api_state.clone());

    let uploads_router = Router::new()
        .route("/uploads/*path", get(api_handler::serve_upload))
        .with_state(api_state);

    health_router
        .merge(uploads_router)
        .nest("/api", api_router)
        // UI endpoint (catch-all for SPA)
        .fallback(crate::adapters::ui_handler::UIHandler::serve)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

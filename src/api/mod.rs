//! HTTP surface: shared state, router assembly and error mapping.

mod admin;
mod cart;
mod checkout;
mod storefront;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use thiserror::Error;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::directory::ProductDirectory;
use crate::store::{CartStore, CatalogStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub carts: CartStore,
    pub directory: Arc<RwLock<ProductDirectory>>,
    pub config: Arc<AppConfig>,
    pub nats: Option<async_nats::Client>,
}

impl AppState {
    /// Replaces the directory snapshot with a fresh catalog load and returns
    /// the product count.
    pub async fn reload_directory(&self) -> Result<usize, StoreError> {
        let products = self.catalog.list_by_name().await?;
        let count = products.len();
        self.directory.write().await.replace_all(products);
        Ok(count)
    }
}

/// User-visible API failures. Store problems collapse into one generic
/// message; the real error only reaches the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("No encontrado.")]
    NotFound,
    #[error("Hubo un problema con la tienda. Probá de nuevo.")]
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        tracing::error!(%error, "catalog store operation failed");
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/catalog/reload", post(reload_catalog))
        .route("/api/v1/products", get(storefront::list_products))
        .route("/api/v1/products/:id", get(storefront::product_detail))
        .route("/api/v1/products/:id/share", get(storefront::share_link))
        .route("/api/v1/deeplink", get(storefront::resolve_deeplink))
        .route(
            "/api/v1/cart/:session",
            get(cart::cart_view).delete(cart::clear_cart),
        )
        .route("/api/v1/cart/:session/items", post(cart::add_item))
        .route(
            "/api/v1/cart/:session/items/:id",
            put(cart::change_quantity).delete(cart::remove_item),
        )
        .route("/api/v1/cart/:session/checkout", post(checkout::checkout))
        .route(
            "/api/v1/admin/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/api/v1/admin/products/:id",
            get(admin::product_form)
                .put(admin::update_product)
                .delete(admin::delete_product),
        )
        .route("/api/v1/admin/stats", get(admin::stats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy", "service": "tooldepot" }))
}

async fn reload_catalog(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let count = state.reload_directory().await?;
    Ok(Json(serde_json::json!({ "products": count })))
}

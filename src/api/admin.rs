//! Admin catalog management: CRUD, live search and aggregate statistics.
//!
//! Every mutation reloads the shared directory so the storefront's next
//! request and the admin statistics both see the fresh catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::events::{CatalogEvent, CATALOG_SUBJECT};
use crate::domain::filter::admin_matches;
use crate::domain::product::{Product, ProductDraft};
use crate::domain::stats::CatalogStats;

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct AdminListQuery {
    /// Live search text, matched against name, brand and description.
    #[serde(default)]
    buscar: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AdminRow {
    id: String,
    name: String,
    brand: String,
    price_text: String,
    stock: u32,
    wireless: bool,
}

impl AdminRow {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price_text: product.unit_price().format_ars(),
            stock: product.stock,
            wireless: product.wireless,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct AdminListResponse {
    products: Vec<AdminRow>,
    /// Statistics always cover the full catalog, not the filtered view.
    stats: StatsResponse,
}

#[derive(Debug, Serialize)]
pub(super) struct StatsResponse {
    total: usize,
    in_stock: usize,
    out_of_stock: usize,
    inventory_value_text: String,
}

impl StatsResponse {
    fn from_stats(stats: &CatalogStats) -> Self {
        Self {
            total: stats.total,
            in_stock: stats.in_stock,
            out_of_stock: stats.out_of_stock,
            inventory_value_text: stats.formatted_value(),
        }
    }
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Json<AdminListResponse> {
    let directory = state.directory.read().await;
    let products = directory
        .products()
        .iter()
        .filter(|product| admin_matches(product, &query.buscar))
        .map(AdminRow::from_product)
        .collect();
    let stats = CatalogStats::compute(directory.products());
    Json(AdminListResponse {
        products,
        stats: StatsResponse::from_stats(&stats),
    })
}

pub(super) async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let directory = state.directory.read().await;
    let stats = CatalogStats::compute(directory.products());
    Json(StatsResponse::from_stats(&stats))
}

/// A product rendered back in form shape for the edit screen: list fields
/// joined the way the form expects to split them again.
#[derive(Debug, Serialize)]
pub(super) struct ProductFormView {
    id: String,
    name: String,
    brand: String,
    price: String,
    stock: String,
    category: String,
    wireless: bool,
    images: String,
    description: String,
    shipping_options: String,
    details: String,
}

impl ProductFormView {
    fn from_product(product: &Product) -> Self {
        let images = if product.images.is_empty() {
            if product.image.is_empty() {
                String::new()
            } else {
                product.image.clone()
            }
        } else {
            product.images.join(", ")
        };
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            category: product.category.clone(),
            wireless: product.wireless,
            images,
            description: product.description.clone(),
            shipping_options: product.shipping_options.join(", "),
            details: product.details.join("\n"),
        }
    }
}

pub(super) async fn product_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductFormView>, ApiError> {
    let product = state.catalog.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(ProductFormView::from_product(&product)))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    draft
        .validate()
        .map_err(|errors| ApiError::Validation(errors.to_string()))?;
    let fields = draft
        .build()
        .map_err(|error| ApiError::Validation(error.to_string()))?;

    let product = state.catalog.insert(&fields).await?;
    state.reload_directory().await?;
    publish_event(
        &state,
        CatalogEvent::ProductCreated {
            product_id: product.id.clone(),
            name: product.name.clone(),
        },
    )
    .await;
    Ok((StatusCode::CREATED, Json(product)))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, ApiError> {
    draft
        .validate()
        .map_err(|errors| ApiError::Validation(errors.to_string()))?;
    let fields = draft
        .build()
        .map_err(|error| ApiError::Validation(error.to_string()))?;

    let product = state
        .catalog
        .update(&id, &fields)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.reload_directory().await?;
    publish_event(
        &state,
        CatalogEvent::ProductUpdated {
            product_id: product.id.clone(),
            name: product.name.clone(),
        },
    )
    .await;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteRequest {
    /// Must repeat the product's name; deleting is irrecoverable.
    confirm: String,
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DeleteRequest>,
) -> Result<StatusCode, ApiError> {
    let product = state.catalog.get(&id).await?.ok_or(ApiError::NotFound)?;
    if request.confirm.trim() != product.name {
        return Err(ApiError::Validation(format!(
            "Escribí \"{}\" para confirmar la eliminación.",
            product.name
        )));
    }

    state.catalog.delete(&id).await?;
    state.reload_directory().await?;
    publish_event(
        &state,
        CatalogEvent::ProductDeleted {
            product_id: product.id,
            name: product.name,
        },
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

/// Catalog events are best-effort; a bus failure never fails the mutation.
async fn publish_event(state: &AppState, event: CatalogEvent) {
    let Some(client) = &state.nats else {
        return;
    };
    match serde_json::to_vec(&event) {
        Ok(payload) => {
            if let Err(error) = client.publish(CATALOG_SUBJECT.to_string(), payload.into()).await {
                tracing::warn!(%error, product_id = event.product_id(), "failed to publish catalog event");
            }
        }
        Err(error) => tracing::warn!(%error, "failed to encode catalog event"),
    }
}

//! Session cart endpoints.
//!
//! Every mutation persists the full line list before responding; a failed
//! write is logged and the refreshed in-memory view is returned anyway.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::cart::{Cart, CartError};
use crate::domain::directory::ProductDirectory;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CartLineView {
    id: String,
    name: String,
    quantity: u32,
    unit_price_text: String,
    subtotal_text: String,
}

#[derive(Debug, Serialize)]
pub(super) struct CartView {
    lines: Vec<CartLineView>,
    item_count: u32,
    total_text: String,
    /// Hint for the UI to open the cart panel ("comprar ahora").
    open_panel: bool,
}

impl CartView {
    fn build(cart: &Cart, directory: &ProductDirectory, open_panel: bool) -> Self {
        let lines = cart
            .lines()
            .iter()
            .filter_map(|line| {
                directory.find_by_id(&line.id).map(|product| CartLineView {
                    id: line.id.clone(),
                    name: product.name.clone(),
                    quantity: line.quantity,
                    unit_price_text: product.unit_price().format_ars(),
                    subtotal_text: product.unit_price().multiply(line.quantity).format_ars(),
                })
            })
            .collect();
        Self {
            lines,
            item_count: cart.item_count(),
            total_text: cart.total(directory).format_ars(),
            open_panel,
        }
    }
}

pub(super) async fn cart_view(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let cart = state.carts.load(&session).await?;
    let directory = state.directory.read().await;
    Ok(Json(CartView::build(&cart, &directory, false)))
}

#[derive(Debug, Deserialize)]
pub(super) struct AddItemRequest {
    product_id: String,
    /// "Comprar ahora": add and ask the UI to open the cart panel.
    #[serde(default)]
    buy_now: bool,
}

pub(super) async fn add_item(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    let mut cart = state.carts.load(&session).await?;
    let directory = state.directory.read().await;
    match cart.add(&directory, &request.product_id) {
        Ok(()) => {
            persist(&state, &session, &cart).await;
            Ok(Json(CartView::build(&cart, &directory, request.buy_now)))
        }
        // Stale ids are skipped, not surfaced.
        Err(CartError::UnknownProduct) => Ok(Json(CartView::build(&cart, &directory, false))),
        Err(error) => Err(ApiError::Validation(error.to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChangeQuantityRequest {
    delta: i64,
}

pub(super) async fn change_quantity(
    State(state): State<AppState>,
    Path((session, id)): Path<(String, String)>,
    Json(request): Json<ChangeQuantityRequest>,
) -> Result<Json<CartView>, ApiError> {
    let mut cart = state.carts.load(&session).await?;
    let directory = state.directory.read().await;
    match cart.change_quantity(&directory, &id, request.delta) {
        Ok(()) => {
            persist(&state, &session, &cart).await;
            Ok(Json(CartView::build(&cart, &directory, false)))
        }
        Err(error) => Err(ApiError::Validation(error.to_string())),
    }
}

pub(super) async fn remove_item(
    State(state): State<AppState>,
    Path((session, id)): Path<(String, String)>,
) -> Result<Json<CartView>, ApiError> {
    let mut cart = state.carts.load(&session).await?;
    cart.remove(&id);
    persist(&state, &session, &cart).await;
    let directory = state.directory.read().await;
    Ok(Json(CartView::build(&cart, &directory, false)))
}

pub(super) async fn clear_cart(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let mut cart = state.carts.load(&session).await?;
    cart.clear();
    persist(&state, &session, &cart).await;
    let directory = state.directory.read().await;
    Ok(Json(CartView::build(&cart, &directory, false)))
}

/// Cart writes never fail the request; the in-memory state wins.
async fn persist(state: &AppState, session: &str, cart: &Cart) {
    if let Err(error) = state.carts.save(session, cart).await {
        tracing::warn!(%error, session, "failed to persist cart");
    }
}

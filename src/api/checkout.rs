//! Checkout endpoint: turns the session cart into a WhatsApp order link.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use validator::Validate;

use crate::domain::checkout::{CheckoutOrder, CheckoutRequest};

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CheckoutResponse {
    message: String,
    whatsapp_url: String,
}

pub(super) async fn checkout(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    request
        .validate()
        .map_err(|errors| ApiError::Validation(errors.to_string()))?;

    let cart = state.carts.load(&session).await?;
    let directory = state.directory.read().await;
    let order = CheckoutOrder::build(&cart, &directory, &request)
        .map_err(|error| ApiError::Validation(error.to_string()))?;

    Ok(Json(CheckoutResponse {
        message: order.message(),
        whatsapp_url: order.whatsapp_url(&state.config.whatsapp_number),
    }))
}

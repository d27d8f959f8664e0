//! Storefront read model: product listing, detail views and deep links.

use axum::extract::{Path, Query, RawQuery, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::deeplink::{share_url, Navigation};
use crate::domain::filter::{ProductFilter, SortOrder, WirelessFilter};
use crate::domain::product::Product;

use super::{ApiError, AppState};

/// Filter controls as they arrive on the query string; values mirror the
/// storefront selectors (`todas`, `si`/`no`, `precio-asc`/`precio-desc`).
#[derive(Debug, Default, Deserialize)]
pub(super) struct ListQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    marca: Option<String>,
    #[serde(default)]
    inalambrico: Option<String>,
    #[serde(default)]
    orden: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            query: self.q,
            brand: self.marca,
            wireless: self
                .inalambrico
                .as_deref()
                .map(WirelessFilter::parse)
                .unwrap_or_default(),
            sort: self
                .orden
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProductCard {
    id: String,
    name: String,
    brand: String,
    price: Decimal,
    price_text: String,
    stock: u32,
    out_of_stock: bool,
    wireless: bool,
    image: String,
    description: String,
    shipping_options: Vec<String>,
}

impl ProductCard {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            price_text: product.unit_price().format_ars(),
            stock: product.stock,
            out_of_stock: product.is_out_of_stock(),
            wireless: product.wireless,
            image: product.image.clone(),
            description: product.description.clone(),
            shipping_options: product.shipping_options.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ListResponse {
    products: Vec<ProductCard>,
    /// Distinct brands across the whole catalog, for the brand selector.
    brands: Vec<String>,
    total: usize,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ListResponse> {
    let directory = state.directory.read().await;
    let filter = query.into_filter();
    let selected = filter.apply(directory.products());
    Json(ListResponse {
        total: selected.len(),
        products: selected.iter().map(|p| ProductCard::from_product(p)).collect(),
        brands: directory.brands(),
    })
}

#[derive(Debug, Serialize)]
pub(super) struct DetailResponse {
    id: String,
    name: String,
    brand: String,
    price_text: String,
    stock: u32,
    out_of_stock: bool,
    wireless: bool,
    description: String,
    /// Carousel image list; never empty.
    images: Vec<String>,
    details: Vec<String>,
    shipping_options: Vec<String>,
    share_url: String,
}

impl DetailResponse {
    fn from_product(product: &Product, base_url: &str) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price_text: product.unit_price().format_ars(),
            stock: product.stock,
            out_of_stock: product.is_out_of_stock(),
            wireless: product.wireless,
            description: product.description.clone(),
            images: product.carousel_images(),
            details: product.details.clone(),
            shipping_options: product.shipping_options.clone(),
            share_url: share_url(base_url, &product.id),
        }
    }
}

pub(super) async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, ApiError> {
    let directory = state.directory.read().await;
    let product = directory.find_by_id(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(DetailResponse::from_product(
        product,
        &state.config.public_base_url,
    )))
}

#[derive(Debug, Serialize)]
pub(super) struct ShareResponse {
    url: String,
}

pub(super) async fn share_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShareResponse>, ApiError> {
    let directory = state.directory.read().await;
    let product = directory.find_by_id(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(ShareResponse {
        url: share_url(&state.config.public_base_url, &product.id),
    }))
}

#[derive(Debug, Serialize)]
pub(super) struct DeepLinkResponse {
    open: bool,
    product: Option<DetailResponse>,
}

/// Resolves a landing URL's query string to the detail state it encodes.
/// Stale or absent ids resolve to the closed state, never an error.
pub(super) async fn resolve_deeplink(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<DeepLinkResponse> {
    let directory = state.directory.read().await;
    let navigation = Navigation::from_query(&directory, query.as_deref().unwrap_or(""));
    let product = navigation
        .detail()
        .and_then(|detail| directory.find_by_id(&detail.product_id))
        .map(|product| DetailResponse::from_product(product, &state.config.public_base_url));
    Json(DeepLinkResponse {
        open: product.is_some(),
        product,
    })
}

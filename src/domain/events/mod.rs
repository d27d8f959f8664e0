//! Catalog domain events, published after admin mutations when a message
//! bus is configured.

use serde::{Deserialize, Serialize};

/// Subject catalog events are published on.
pub const CATALOG_SUBJECT: &str = "catalog.events";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    ProductCreated { product_id: String, name: String },
    ProductUpdated { product_id: String, name: String },
    ProductDeleted { product_id: String, name: String },
}

impl CatalogEvent {
    pub fn product_id(&self) -> &str {
        match self {
            CatalogEvent::ProductCreated { product_id, .. }
            | CatalogEvent::ProductUpdated { product_id, .. }
            | CatalogEvent::ProductDeleted { product_id, .. } => product_id,
        }
    }
}

//! Postgres-backed stores: the product catalog and the durable session
//! carts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartLine};
use crate::domain::product::{Product, ProductFields};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("cart state could not be serialized")]
    Serialize(#[source] serde_json::Error),
}

pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    brand: String,
    price: Decimal,
    stock: i32,
    category: String,
    wireless: bool,
    image: String,
    images: Vec<String>,
    description: String,
    shipping_options: Vec<String>,
    details: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            brand: row.brand,
            price: row.price,
            // rows predating the stock check may hold negatives
            stock: u32::try_from(row.stock).unwrap_or(0),
            category: row.category,
            wireless: row.wireless,
            image: row.image,
            images: row.images,
            description: row.description,
            shipping_options: row.shipping_options,
            details: row.details,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The remote product collection. Ids are assigned here on insert.
#[derive(Clone)]
pub struct CatalogStore {
    pool: PgPool,
}

impl CatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All products, ordered by name.
    pub async fn list_by_name(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    pub async fn insert(&self, fields: &ProductFields) -> Result<Product, StoreError> {
        let id = Uuid::now_v7().to_string();
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (id, name, brand, price, stock, category, wireless, image, images, description, shipping_options, details, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW()) RETURNING *",
        )
        .bind(&id)
        .bind(&fields.name)
        .bind(&fields.brand)
        .bind(fields.price)
        .bind(fields.stock as i32)
        .bind(&fields.category)
        .bind(fields.wireless)
        .bind(&fields.image)
        .bind(&fields.images)
        .bind(&fields.description)
        .bind(&fields.shipping_options)
        .bind(&fields.details)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    pub async fn update(&self, id: &str, fields: &ProductFields) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET name = $2, brand = $3, price = $4, stock = $5, category = $6, wireless = $7, image = $8, images = $9, description = $10, shipping_options = $11, details = $12, updated_at = NOW()
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.brand)
        .bind(fields.price)
        .bind(fields.stock as i32)
        .bind(&fields.category)
        .bind(fields.wireless)
        .bind(&fields.image)
        .bind(&fields.images)
        .bind(&fields.description)
        .bind(&fields.shipping_options)
        .bind(&fields.details)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    /// Hard delete; gone is gone.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Durable cart persistence: one serialized line list per session.
#[derive(Clone)]
pub struct CartStore {
    pool: PgPool,
}

impl CartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the session cart. A missing row is an empty cart; unreadable
    /// stored state also degrades to empty rather than failing the session.
    pub async fn load(&self, session_id: &str) -> Result<Cart, StoreError> {
        let stored: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT lines FROM carts WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(stored.map(|(value,)| decode_lines(value)).unwrap_or_default())
    }

    pub async fn save(&self, session_id: &str, cart: &Cart) -> Result<(), StoreError> {
        let lines = serde_json::to_value(cart.lines()).map_err(StoreError::Serialize)?;
        sqlx::query(
            "INSERT INTO carts (session_id, lines, updated_at) VALUES ($1, $2, NOW())
             ON CONFLICT (session_id) DO UPDATE SET lines = $2, updated_at = NOW()",
        )
        .bind(session_id)
        .bind(&lines)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn decode_lines(value: serde_json::Value) -> Cart {
    match serde_json::from_value::<Vec<CartLine>>(value) {
        Ok(lines) => Cart::from_lines(lines),
        Err(error) => {
            tracing::warn!(%error, "stored cart unreadable, resetting to empty");
            Cart::new()
        }
    }
}

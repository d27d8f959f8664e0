//! Catalog product record and the admin form rules that produce it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::value_objects::Money;

/// Fallback artwork used whenever a product carries no images.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=Producto";

/// A catalog product as the storefront sees it. Ids are assigned by the
/// catalog store; price and stock always carry a value (absent or invalid
/// input coerces to 0 before a record is built).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub wireless: bool,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shipping_options: Vec<String>,
    #[serde(default)]
    pub details: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn unit_price(&self) -> Money {
        Money::new(self.price)
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Image list for the detail carousel; never empty.
    pub fn carousel_images(&self) -> Vec<String> {
        if !self.images.is_empty() {
            return self.images.clone();
        }
        if self.image.is_empty() {
            vec![PLACEHOLDER_IMAGE.to_string()]
        } else {
            vec![self.image.clone()]
        }
    }
}

/// Admin form payload for create and update, string-typed the way the form
/// submits it. [`ProductDraft::build`] applies the coercion and splitting
/// rules.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ProductDraft {
    #[serde(default)]
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub wireless: bool,
    /// Comma-separated image URL list; the first entry becomes the primary
    /// image.
    #[serde(default)]
    pub images: String,
    #[serde(default)]
    pub description: String,
    /// Comma-separated shipping option labels.
    #[serde(default)]
    pub shipping_options: String,
    /// One detail bullet per line.
    #[serde(default)]
    pub details: String,
}

/// The validated column set the catalog store persists; ids and timestamps
/// are the store's business.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: String,
    pub wireless: bool,
    pub image: String,
    pub images: Vec<String>,
    pub description: String,
    pub shipping_options: Vec<String>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("El nombre es obligatorio.")]
    MissingName,
}

impl ProductDraft {
    /// Trims and splits the form fields, coercing price and stock to 0 when
    /// absent or unparseable, and substituting the placeholder when no image
    /// was given.
    pub fn build(&self) -> Result<ProductFields, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }

        let images = split_list(&self.images, ',');
        let image = images
            .first()
            .cloned()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Ok(ProductFields {
            name: name.to_string(),
            brand: self.brand.trim().to_string(),
            price: self.price.trim().parse().unwrap_or(Decimal::ZERO),
            stock: self.stock.trim().parse().unwrap_or(0),
            category: self.category.trim().to_string(),
            wireless: self.wireless,
            image,
            images,
            description: self.description.trim().to_string(),
            shipping_options: split_list(&self.shipping_options, ','),
            details: self
                .details
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(id: &str, name: &str, price: i64, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            brand: String::new(),
            price: Decimal::new(price, 0),
            stock,
            category: String::new(),
            wireless: false,
            image: "https://cdn.example/taladro.jpg".to_string(),
            images: vec![],
            description: String::new(),
            shipping_options: vec![],
            details: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_draft_splits_and_trims_list_fields() {
        let draft = ProductDraft {
            name: "  Taladro percutor ".to_string(),
            shipping_options: "Envío a domicilio, , Retiro en el local ".to_string(),
            details: "  850W\n\n  13mm de mandril  \n".to_string(),
            images: "https://a.jpg , https://b.jpg,".to_string(),
            ..ProductDraft::default()
        };
        let fields = draft.build().unwrap();
        assert_eq!(fields.name, "Taladro percutor");
        assert_eq!(
            fields.shipping_options,
            vec!["Envío a domicilio", "Retiro en el local"]
        );
        assert_eq!(fields.details, vec!["850W", "13mm de mandril"]);
        assert_eq!(fields.images, vec!["https://a.jpg", "https://b.jpg"]);
        assert_eq!(fields.image, "https://a.jpg");
    }

    #[test]
    fn test_draft_substitutes_placeholder_when_no_image() {
        let draft = ProductDraft {
            name: "Amoladora".to_string(),
            ..ProductDraft::default()
        };
        let fields = draft.build().unwrap();
        assert_eq!(fields.image, PLACEHOLDER_IMAGE);
        assert!(fields.images.is_empty());
    }

    #[test]
    fn test_draft_coerces_invalid_numbers_to_zero() {
        let draft = ProductDraft {
            name: "Sierra circular".to_string(),
            price: "no es un precio".to_string(),
            stock: "-3".to_string(),
            ..ProductDraft::default()
        };
        let fields = draft.build().unwrap();
        assert_eq!(fields.price, Decimal::ZERO);
        assert_eq!(fields.stock, 0);
    }

    #[test]
    fn test_draft_rejects_blank_name() {
        let draft = ProductDraft {
            name: "   ".to_string(),
            ..ProductDraft::default()
        };
        assert_eq!(draft.build(), Err(DraftError::MissingName));
    }

    #[test]
    fn test_carousel_falls_back_to_primary_then_placeholder() {
        let mut product = sample_product("p1", "Taladro", 100, 2);
        assert_eq!(product.carousel_images(), vec![product.image.clone()]);

        product.images = vec!["https://a.jpg".into(), "https://b.jpg".into()];
        assert_eq!(product.carousel_images().len(), 2);

        product.images.clear();
        product.image.clear();
        assert_eq!(product.carousel_images(), vec![PLACEHOLDER_IMAGE.to_string()]);
    }
}

//! Aggregate catalog statistics for the admin dashboard.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::product::Product;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    /// Σ stock × price over the whole catalog.
    pub inventory_value: Decimal,
}

impl CatalogStats {
    pub fn compute(products: &[Product]) -> Self {
        let mut stats = Self::default();
        for product in products {
            stats.total += 1;
            if product.stock > 0 {
                stats.in_stock += 1;
            } else {
                stats.out_of_stock += 1;
            }
            stats.inventory_value += product.price * Decimal::from(product.stock);
        }
        stats
    }

    pub fn formatted_value(&self) -> String {
        Money::new(self.inventory_value).format_ars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price: i64, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Producto {id}"),
            brand: String::new(),
            price: Decimal::new(price, 0),
            stock,
            category: String::new(),
            wireless: false,
            image: String::new(),
            images: vec![],
            description: String::new(),
            shipping_options: vec![],
            details: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_counts_and_inventory_value_over_mixed_catalog() {
        let products = vec![
            product("p1", 1_000, 3),
            product("p2", 500, 0),
            product("p3", 2_000, 1),
        ];
        let stats = CatalogStats::compute(&products);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.in_stock, 2);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.inventory_value, Decimal::new(5_000, 0));
        assert_eq!(stats.formatted_value(), "$ 5.000");
    }

    #[test]
    fn test_empty_catalog_is_all_zeroes() {
        let stats = CatalogStats::compute(&[]);
        assert_eq!(stats, CatalogStats::default());
    }
}

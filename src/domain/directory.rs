//! In-memory snapshot of the catalog.

use crate::domain::product::Product;

/// The product list the storefront works against. Loaded from the catalog
/// store ordered by name and replaced wholesale; never mutated in place
/// between loads.
#[derive(Clone, Debug, Default)]
pub struct ProductDirectory {
    products: Vec<Product>,
}

impl ProductDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Lookup by store-assigned id. Callers treat `None` as a silent skip.
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Distinct non-empty brands in first-seen order, for the brand filter.
    pub fn brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = Vec::new();
        for product in &self.products {
            if !product.brand.is_empty() && !brands.iter().any(|b| b == &product.brand) {
                brands.push(product.brand.clone());
            }
        }
        brands
    }
}

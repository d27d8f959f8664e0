//! Shopping cart aggregate.
//!
//! One line per product id, quantity capped by the product's current stock.
//! Persistence is the caller's concern; the aggregate only guarantees that
//! no sequence of operations can violate `0 < quantity <= stock`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::directory::ProductDirectory;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Stale or unknown id; callers skip silently.
    #[error("Producto inexistente.")]
    UnknownProduct,
    #[error("\"{name}\" está agotado.")]
    OutOfStock { name: String },
    #[error("No hay más stock disponible de \"{name}\". Stock máximo: {stock} unidades.")]
    StockCeiling { name: String, stock: u32 },
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from persisted lines, restoring the invariants: empty
    /// quantities are dropped and duplicate ids collapse into the first line.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match cart.lines.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => existing.quantity += line.quantity,
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Unit total across all lines, for the cart badge.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Adds one unit of the product, creating the line at quantity 1.
    /// Rejects unknown products, exhausted stock, and lines already at the
    /// stock ceiling.
    pub fn add(&mut self, directory: &ProductDirectory, id: &str) -> Result<(), CartError> {
        let product = directory.find_by_id(id).ok_or(CartError::UnknownProduct)?;
        if product.stock == 0 {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }

        let current = self.line(id).map_or(0, |line| line.quantity);
        if current >= product.stock {
            return Err(CartError::StockCeiling {
                name: product.name.clone(),
                stock: product.stock,
            });
        }

        match self.lines.iter_mut().find(|line| line.id == id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                id: id.to_string(),
                quantity: 1,
            }),
        }
        Ok(())
    }

    /// Applies `delta` to an existing line. Absent lines and unresolvable
    /// products are skipped; an increase past the stock ceiling is rejected;
    /// a result of zero or less removes the line.
    pub fn change_quantity(
        &mut self,
        directory: &ProductDirectory,
        id: &str,
        delta: i64,
    ) -> Result<(), CartError> {
        let Some(index) = self.lines.iter().position(|line| line.id == id) else {
            return Ok(());
        };
        let Some(product) = directory.find_by_id(id) else {
            return Ok(());
        };

        let next = i64::from(self.lines[index].quantity) + delta;
        if delta > 0 && next > i64::from(product.stock) {
            return Err(CartError::StockCeiling {
                name: product.name.clone(),
                stock: product.stock,
            });
        }

        if next <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = next as u32;
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &str) {
        self.lines.retain(|line| line.id != id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Order total over resolvable lines; stale ids contribute nothing.
    pub fn total(&self, directory: &ProductDirectory) -> Money {
        self.lines.iter().fold(Money::zero(), |total, line| {
            match directory.find_by_id(&line.id) {
                Some(product) => total.add(&product.unit_price().multiply(line.quantity)),
                None => total,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Product;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(id: &str, name: &str, price: i64, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
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

    fn directory() -> ProductDirectory {
        ProductDirectory::with_products(vec![
            product("p1", "Taladro", 100, 2),
            product("p2", "Amoladora", 250, 5),
            product("agotado", "Sierra", 900, 0),
        ])
    }

    #[test]
    fn test_add_stops_at_the_stock_ceiling() {
        let directory = directory();
        let mut cart = Cart::new();

        assert!(cart.add(&directory, "p1").is_ok());
        assert!(cart.add(&directory, "p1").is_ok());
        assert_eq!(cart.line("p1").map(|l| l.quantity), Some(2));

        let rejected = cart.add(&directory, "p1");
        assert_eq!(
            rejected,
            Err(CartError::StockCeiling {
                name: "Taladro".to_string(),
                stock: 2
            })
        );
        assert_eq!(cart.line("p1").map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_add_rejects_exhausted_and_unknown_products() {
        let directory = directory();
        let mut cart = Cart::new();

        assert!(matches!(
            cart.add(&directory, "agotado"),
            Err(CartError::OutOfStock { .. })
        ));
        assert_eq!(cart.add(&directory, "p99"), Err(CartError::UnknownProduct));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_skips_absent_lines() {
        let directory = directory();
        let mut cart = Cart::new();
        assert_eq!(cart.change_quantity(&directory, "p1", 1), Ok(()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_rejects_increase_past_stock() {
        let directory = directory();
        let mut cart = Cart::new();
        cart.add(&directory, "p1").unwrap();
        cart.add(&directory, "p1").unwrap();

        assert!(matches!(
            cart.change_quantity(&directory, "p1", 1),
            Err(CartError::StockCeiling { stock: 2, .. })
        ));
        assert_eq!(cart.line("p1").map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_change_quantity_removes_line_at_zero() {
        let directory = directory();
        let mut cart = Cart::new();
        cart.add(&directory, "p2").unwrap();
        cart.change_quantity(&directory, "p2", -1).unwrap();
        assert!(cart.line("p2").is_none());
    }

    #[test]
    fn test_total_skips_unresolvable_lines() {
        let directory = directory();
        let mut cart = Cart::from_lines(vec![
            CartLine { id: "p1".into(), quantity: 2 },
            CartLine { id: "retirado".into(), quantity: 4 },
        ]);
        assert_eq!(cart.total(&directory).amount(), Decimal::new(200, 0));

        cart.remove("retirado");
        assert_eq!(cart.total(&directory).amount(), Decimal::new(200, 0));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let directory = directory();
        let mut cart = Cart::new();
        cart.add(&directory, "p1").unwrap();
        cart.add(&directory, "p2").unwrap();
        cart.add(&directory, "p2").unwrap();
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_serialized_lines_round_trip() {
        let directory = directory();
        let mut cart = Cart::new();
        cart.add(&directory, "p1").unwrap();
        cart.add(&directory, "p2").unwrap();
        cart.add(&directory, "p2").unwrap();

        let stored = serde_json::to_string(cart.lines()).unwrap();
        let restored = Cart::from_lines(serde_json::from_str(&stored).unwrap());
        assert_eq!(restored.lines(), cart.lines());
    }

    #[test]
    fn test_from_lines_restores_invariants() {
        let cart = Cart::from_lines(vec![
            CartLine { id: "p1".into(), quantity: 0 },
            CartLine { id: "p2".into(), quantity: 1 },
            CartLine { id: "p2".into(), quantity: 2 },
        ]);
        assert_eq!(cart.lines(), &[CartLine { id: "p2".into(), quantity: 3 }]);
    }

    #[test]
    fn test_clear_empties_everything() {
        let directory = directory();
        let mut cart = Cart::new();
        cart.add(&directory, "p1").unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}

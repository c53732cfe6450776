//! Cart line record.

use serde::{Deserialize, Serialize};

use crate::{Price, Product, ProductId};

/// One cart line.
///
/// `price` is a snapshot copied from the product when the line was first
/// added; it is never re-derived from the catalog afterwards. Adding the same
/// product again increments `quantity` instead of creating a second line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Price of the whole line (`price` x `quantity`), saturating on overflow.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_snapshots_price() {
        let product = Product {
            id: ProductId::new(3),
            name: "Tea".to_string(),
            description: "Loose leaf".to_string(),
            price: Price::from_cents(450),
        };
        let item = CartItem::from(&product);
        assert_eq!(item.id, product.id);
        assert_eq!(item.price, product.price);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_line_total() {
        let item = CartItem {
            id: ProductId::new(1),
            name: "Mug".to_string(),
            price: Price::from_units(5),
            quantity: 3,
        };
        assert_eq!(item.line_total(), Price::from_units(15));
    }

    #[test]
    fn test_line_total_of_unbounded_price_does_not_panic() {
        let item = CartItem {
            id: ProductId::new(1),
            name: "Vault".to_string(),
            price: serde_json::from_str("\"50000000000000000000000000000\"").unwrap(),
            quantity: 2,
        };
        assert_eq!(item.line_total().to_cents(), None);
    }
}

//! Catalog product record.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A catalog entry as returned by the remote `GET /products` endpoint.
///
/// Products are immutable once loaded; the product list is replaced wholesale
/// on every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_description_is_optional() {
        let product: Product =
            serde_json::from_str(r#"{"id":1,"name":"Mug","price":5}"#).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name, "Mug");
        assert!(product.description.is_empty());
        assert_eq!(product.price.to_string(), "$5");
    }
}

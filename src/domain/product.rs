/// Represents a product in the catalog.
///
/// # Actor Framework
/// This struct implements the [`Entity`](crate::actor_framework::Entity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::actor_framework::ResourceActor).
///
/// See `product_actor::entity` for details on:
/// - Creation parameters ([`ProductCreate`])
/// - Update parameters ([`ProductUpdate`])
/// - Custom actions ([`ProductAction`](crate::product_actor::ProductAction))
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    /// An absent tag list and an empty one mean the same thing.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (typically set by the actor system)
    /// * `name` - Product name
    /// * `price` - Current catalog price
    /// * `stock` - Available stock quantity
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            stock,
            tags: Vec::new(),
        }
    }
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            stock,
            tags: Vec::new(),
        }
    }
}

/// Partial update of a product. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tags_deserialize_as_empty() {
        let product: Product = serde_json::from_str(
            r#"{"id":"prod_1","name":"Milk","price":"2.10","stock":4}"#,
        )
        .unwrap();
        assert!(product.tags.is_empty());
        assert_eq!(product.description, "");

        let explicit_empty: Product = serde_json::from_str(
            r#"{"id":"prod_1","name":"Milk","price":"2.10","stock":4,"tags":[]}"#,
        )
        .unwrap();
        assert_eq!(product, explicit_empty);
    }
}

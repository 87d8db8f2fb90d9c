use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::cart_actor::CartError;
use crate::domain::{CartItem, CartItemCreate, CartItemUpdate};
use crate::product_actor::PriceCatalog;

/// Client for interacting with the Cart actor.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<CartItem>,
    catalog: Arc<dyn PriceCatalog>,
}

impl_client_methods!(CartClient, CartItem, CartError, item);

impl CartClient {
    pub fn new(inner: ResourceClient<CartItem>, catalog: Arc<dyn PriceCatalog>) -> Self {
        Self { inner, catalog }
    }

    /// Add a product to a user's cart, snapshotting the current catalog price when
    /// none is given.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i32,
        price: Option<Decimal>,
    ) -> Result<CartItem, CartError> {
        if user_id.trim().is_empty() || product_id.trim().is_empty() {
            return Err(CartError::InvalidInput(
                "user_id and product_id are required".to_string(),
            ));
        }
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| {
                CartError::InvalidInput(format!("quantity must be positive, got {quantity}"))
            })?;
        let price = match price {
            Some(price) if price.is_sign_negative() => {
                return Err(CartError::InvalidInput(format!(
                    "price must be non-negative, got {price}"
                )));
            }
            Some(price) => price,
            None => self.catalog.current_price(product_id).await?,
        };

        debug!("Sending request");
        let item = self
            .inner
            .create(CartItemCreate {
                user_id: user_id.to_string(),
                product_id: product_id.to_string(),
                quantity,
                selected: true,
                price,
            })
            .await?;
        info!(item_id = %item.id, "Cart item added");
        Ok(item)
    }

    #[instrument(skip(self, update))]
    pub async fn update_item(&self, id: &str, update: CartItemUpdate) -> Result<CartItem, CartError> {
        debug!("Sending request");
        self.inner.update(id.to_string(), update).await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: &str) -> Result<(), CartError> {
        debug!("Sending request");
        self.inner.delete(id.to_string()).await
    }

    /// A user's cart, most recently updated first.
    #[instrument(skip(self))]
    pub async fn list_items(&self, user_id: &str) -> Result<Vec<CartItem>, CartError> {
        debug!("Sending request");
        let owner = user_id.to_string();
        let mut items = self
            .inner
            .list(move |item: &CartItem| item.user_id == owner)
            .await?;
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items)
    }
}

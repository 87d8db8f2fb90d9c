use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductUpdate};
use crate::product_actor::{PriceCatalog, ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        let product = self.inner.create(product).await?;
        info!(product_id = %product.id, price = %product.price, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id.to_string(), update).await
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: &str) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id.to_string(), ProductAction::CheckStock)
            .await?
        {
            ProductActionResult::StockLevel(level) => Ok(level),
        }
    }

    /// Whether `quantity` units could be sold right now. Nothing is reserved.
    ///
    /// A non-positive quantity is never valid and is answered without a lookup.
    #[instrument(skip(self))]
    pub async fn validate_inventory(&self, id: &str, quantity: i64) -> Result<bool, ProductError> {
        if quantity <= 0 {
            return Ok(false);
        }
        let stock = self.check_stock(id).await?;
        Ok(quantity <= i64::from(stock))
    }
}

#[async_trait]
impl PriceCatalog for ProductClient {
    async fn current_price(&self, product_id: &str) -> Result<Decimal, ProductError> {
        Ok(self.get_product(product_id).await?.price)
    }
}

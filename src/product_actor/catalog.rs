use async_trait::async_trait;
use rust_decimal::Decimal;

use super::ProductError;

/// Price lookup consumed by the order builder and the cart.
///
/// Implemented by [`ProductClient`](crate::clients::ProductClient); tests substitute
/// their own catalog.
#[async_trait]
pub trait PriceCatalog: Send + Sync {
    /// Current catalog price, or [`ProductError::NotFound`].
    async fn current_price(&self, product_id: &str) -> Result<Decimal, ProductError>;
}

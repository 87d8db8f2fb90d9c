use rust_decimal::Decimal;

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductUpdate};

fn validate_price(price: Decimal) -> Result<(), ProductError> {
    if price.is_sign_negative() {
        return Err(ProductError::InvalidInput(format!(
            "price must be non-negative, got {price}"
        )));
    }
    Ok(())
}

impl Entity for Product {
    const NAME: &'static str = "product";

    type Id = String;
    type CreateParams = ProductCreate;
    type UpdateParams = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects an empty name or a negative price.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        if params.name.trim().is_empty() {
            return Err(ProductError::InvalidInput("name is required".to_string()));
        }
        validate_price(params.price)?;

        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            stock: params.stock,
            tags: params.tags,
        })
    }

    /// Applies a partial update. Orders already placed keep their own price snapshot,
    /// so a price change here only affects future orders.
    fn on_update(&mut self, update: ProductUpdate) -> Result<(), ProductError> {
        if let Some(price) = update.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock)),
        }
    }

    /// Every product action is a read.
    fn action_mutated(_result: &ProductActionResult) -> bool {
        false
    }
}

use std::convert::Infallible;

use chrono::Utc;

use super::CartError;
use crate::actor_framework::Entity;
use crate::domain::{CartItem, CartItemCreate, CartItemUpdate};

fn validate_quantity(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidInput(
            "quantity must be positive".to_string(),
        ));
    }
    Ok(())
}

impl Entity for CartItem {
    const NAME: &'static str = "cart_item";

    type Id = String;
    type CreateParams = CartItemCreate;
    type UpdateParams = CartItemUpdate;
    type Action = Infallible;
    type ActionResult = ();
    type Error = CartError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: CartItemCreate) -> Result<Self, CartError> {
        validate_quantity(params.quantity)?;
        Ok(Self {
            id,
            user_id: params.user_id,
            product_id: params.product_id,
            quantity: params.quantity,
            selected: params.selected,
            price: params.price,
            updated_at: Utc::now(),
        })
    }

    fn on_update(&mut self, update: CartItemUpdate) -> Result<(), CartError> {
        if let Some(quantity) = update.quantity {
            validate_quantity(quantity)?;
            self.quantity = quantity;
        }
        if let Some(selected) = update.selected {
            self.selected = selected;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, action: Infallible) -> Result<(), CartError> {
        match action {}
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product line in a user's cart, carrying the price seen when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub selected: bool,
    pub price: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CartItemCreate {
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub selected: bool,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: Option<u32>,
    pub selected: Option<bool>,
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Client-side credentials for completing payment of one order.
///
/// Not persisted; a fresh intent is produced on every pay request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub order_id: String,
    pub provider: String,
    pub credentials: BTreeMap<String, String>,
}

/// What a gateway notification says about an order, once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackResult {
    pub order_id: String,
    pub success: bool,
}

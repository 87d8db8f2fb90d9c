pub mod cart;
pub mod money;
pub mod order;
pub mod payment;
pub mod product;

pub use cart::*;
pub use order::*;
pub use payment::*;
pub use product::*;

use uuid::Uuid;

/// Allocate a globally unique identifier such as `ord_9f1c...` (32 hex digits after the prefix).
pub fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

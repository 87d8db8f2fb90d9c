//! Typed handles over the resource actors. Cross-actor orchestration lives here.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod order_client;
pub mod product_client;

pub use cart_client::*;
pub use order_client::*;
pub use product_client::*;

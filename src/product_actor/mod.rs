//! Product catalog domain logic: pricing lookups and stock checks.

mod actions;
pub mod catalog;
pub mod entity;
pub mod error;

pub use actions::*;
pub use catalog::*;
pub use error::*;

//! Order lifecycle: building, persisting and transitioning orders.

pub mod builder;
pub mod entity;
pub mod error;
pub mod storage;
pub mod transitions;

pub use entity::*;
pub use error::*;
pub use storage::*;
pub use transitions::*;

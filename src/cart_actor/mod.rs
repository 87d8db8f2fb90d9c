//! Per-user shopping cart lines.

pub mod entity;
pub mod error;

pub use error::*;

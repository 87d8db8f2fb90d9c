//! Payment boundary: gateway adapters and callback reconciliation.

pub mod gateway;
pub mod reconciler;
pub mod wechat;

pub use gateway::*;
pub use reconciler::*;
pub use wechat::*;

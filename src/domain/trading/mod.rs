//! Trading aggregate: open positions and the figures derived from them.

pub mod entities;
pub mod services;

pub use entities::*;
pub use services::*;

//! Chart aggregate: value objects and the port to the charting library.

pub mod ports;
pub mod value_objects;

pub use ports::*;
pub use value_objects::*;

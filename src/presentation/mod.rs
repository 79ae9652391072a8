pub mod component;
pub mod wasm_api;

pub use component::PositionChartView;
pub use wasm_api::PositionChartApi;

use wasm_bindgen::prelude::*;

use crate::domain::logging::LogComponent;

pub mod application;
pub mod config;
pub mod domain;
pub mod event_utils;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

pub use application::{HoverProximityDetector, HoverState, PositionChart, PositionOverlayManager, PriceSeriesView};
pub use config::ChartConfig;
pub use domain::errors::{ChartError, ChartResult};
pub use presentation::{PositionChartApi, PositionChartView};

/// Installs the browser logger, clock and panic hook
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    domain::logging::init_logger(Box::new(infrastructure::services::ConsoleLogger::new_development()));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));

    crate::log_info!(LogComponent::Presentation("Initialize"), "position chart module loaded");
}

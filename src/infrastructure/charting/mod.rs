//! Adapters implementing the chart port.

pub mod headless;
pub mod lightweight;

pub use headless::{ChartJournal, HeadlessChart, HeadlessChartFactory, HeadlessLine, SurfaceCall};
pub use lightweight::{LightweightChart, LightweightChartFactory};

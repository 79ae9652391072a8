use std::rc::Rc;

use super::value_objects::{ChartOptions, LogicalRange, Point, PriceLineOptions};
use crate::domain::errors::ChartResult;
use crate::domain::market_data::{Candle, Price, Timestamp};

/// One crosshair movement over the chart pane.
///
/// `time` and `point` are absent when the pointer left the pane; `price` is
/// what the candle series reports under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CrosshairEvent {
    pub time: Option<Timestamp>,
    pub point: Option<Point>,
    pub price: Option<Price>,
}

impl CrosshairEvent {
    pub fn new(time: Timestamp, point: Point, price: Price) -> Self {
        Self { time: Some(time), point: Some(point), price: Some(price) }
    }

    /// Event emitted when the pointer leaves the pane
    pub fn left() -> Self {
        Self::default()
    }
}

pub type CrosshairHandler = Rc<dyn Fn(CrosshairEvent)>;

/// Conversions between chart values and pane pixels
pub trait CoordinateSpace {
    fn time_to_coordinate(&self, time: Timestamp) -> Option<f64>;
    fn price_to_coordinate(&self, price: Price) -> Option<f64>;
}

/// A live chart instance with a single candlestick series.
pub trait ChartSurface: CoordinateSpace {
    /// Opaque handle of a created price line
    type PriceLine;

    /// Replace the whole series dataset
    fn set_candles(&mut self, candles: &[Candle]);

    fn visible_logical_range(&self) -> Option<LogicalRange>;
    fn set_visible_logical_range(&mut self, range: LogicalRange);

    fn create_price_line(&mut self, options: &PriceLineOptions) -> Self::PriceLine;

    /// Fails with `ChartError::StaleHandle` when the line is already gone
    fn remove_price_line(&mut self, line: &Self::PriceLine) -> ChartResult<()>;

    fn subscribe_crosshair_move(&mut self, handler: CrosshairHandler);

    fn set_watermark(&mut self, text: &str);

    fn resize(&mut self, width: u32, height: u32);

    /// Release the instance. Unsubscribes the crosshair handler.
    fn dispose(&mut self);
}

/// Builds chart instances bound to one host container
pub trait ChartFactory {
    type Surface: ChartSurface;

    fn create_chart(&mut self, options: &ChartOptions) -> ChartResult<Self::Surface>;

    /// Current pixel size of the container
    fn container_size(&self) -> (u32, u32);
}

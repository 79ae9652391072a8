use crate::domain::{
    chart::{ChartFactory, ChartOptions, ChartSurface, CrosshairHandler, LogicalRange, Theme},
    errors::ChartResult,
    logging::LogComponent,
    market_data::{Candle, CandleSeries, Price, Symbol},
};
use crate::{log_debug, log_info};

/// Owns the chart instance and the candle snapshot it displays
pub struct PriceSeriesView<S: ChartSurface> {
    surface: Option<S>,
    series: CandleSeries,
    theme: Theme,
    symbol: Symbol,
}

impl<S: ChartSurface> PriceSeriesView<S> {
    pub fn new(theme: Theme, symbol: Symbol) -> Self {
        Self { surface: None, series: CandleSeries::default(), theme, symbol }
    }

    /// Build the chart sized to the container and load the current candles
    pub fn mount<F>(&mut self, factory: &mut F, crosshair: Option<CrosshairHandler>) -> ChartResult<()>
    where
        F: ChartFactory<Surface = S>,
    {
        let (width, height) = factory.container_size();
        if width == 0 || height == 0 {
            log_debug!(
                LogComponent::Application("PriceSeriesView"),
                "container is {}x{}, chart will render empty",
                width,
                height
            );
        }

        let options = ChartOptions::new(width, height, self.theme).with_watermark(self.symbol.value());
        let mut surface = factory.create_chart(&options)?;
        if !self.series.is_empty() {
            surface.set_candles(self.series.candles());
        }
        if let Some(handler) = crosshair {
            surface.subscribe_crosshair_move(handler);
        }
        self.surface = Some(surface);

        log_info!(
            LogComponent::Application("PriceSeriesView"),
            "chart mounted for {} ({}, {}x{})",
            self.symbol,
            self.theme,
            width,
            height
        );
        Ok(())
    }

    /// Replace the candles without moving the user's viewport.
    /// Returns `true` when the latest price changed.
    pub fn set_candles(&mut self, candles: Vec<Candle>) -> bool {
        let previous = self.latest_price();
        self.series = CandleSeries::new(candles);

        if let Some(surface) = self.surface.as_mut() {
            let range = surface.visible_logical_range();
            surface.set_candles(self.series.candles());
            if let Some(range) = range {
                surface.set_visible_logical_range(range);
            }
        }

        previous != self.latest_price()
    }

    pub fn set_symbol(&mut self, symbol: Symbol) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_watermark(symbol.value());
        }
        self.symbol = symbol;
    }

    /// Only takes effect on the next mount
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
    }

    pub fn visible_logical_range(&self) -> Option<LogicalRange> {
        self.surface.as_ref().and_then(|s| s.visible_logical_range())
    }

    pub fn restore_logical_range(&mut self, range: Option<LogicalRange>) {
        if let (Some(surface), Some(range)) = (self.surface.as_mut(), range) {
            surface.set_visible_logical_range(range);
        }
    }

    /// Dispose the chart. Callers release price lines first.
    /// Returns `false` when nothing was mounted.
    pub fn dispose(&mut self) -> bool {
        match self.surface.take() {
            Some(mut surface) => {
                surface.dispose();
                log_debug!(LogComponent::Application("PriceSeriesView"), "chart disposed for {}", self.symbol);
                true
            }
            None => false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn latest_price(&self) -> Option<Price> {
        self.series.latest_price()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }
}

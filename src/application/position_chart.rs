use super::feed::MarketSnapshot;
use super::hover::{HoverProximityDetector, HoverState, PositionTooltip};
use super::overlay::PositionOverlayManager;
use super::price_series_view::PriceSeriesView;
use crate::config::ChartConfig;
use crate::domain::{
    chart::{ChartFactory, ChartSurface, CrosshairEvent, CrosshairHandler, Theme},
    errors::ChartResult,
    logging::LogComponent,
    market_data::{Candle, Symbol, Ticker},
    trading::OpenPosition,
};
use crate::log_info;

type LineOf<F> = <<F as ChartFactory>::Surface as ChartSurface>::PriceLine;

/// The position chart widget: candle series, position overlays and hover
/// tooltip behind one owner.
///
/// Every method runs to completion before the next input is applied, so the
/// overlay set is never observed half rebuilt.
pub struct PositionChart<F: ChartFactory> {
    factory: F,
    series: PriceSeriesView<F::Surface>,
    overlay: PositionOverlayManager<LineOf<F>>,
    hover: HoverProximityDetector,
    positions: Vec<OpenPosition>,
    ticker: Option<Ticker>,
    crosshair_handler: Option<CrosshairHandler>,
}

impl<F: ChartFactory> PositionChart<F> {
    pub fn new(factory: F, config: ChartConfig, theme: Theme, symbol: Symbol) -> Self {
        Self {
            factory,
            series: PriceSeriesView::new(theme, symbol),
            overlay: PositionOverlayManager::new(config.overlay),
            hover: HoverProximityDetector::new(config.hover),
            positions: Vec::new(),
            ticker: None,
            crosshair_handler: None,
        }
    }

    /// Handler subscribed to every chart instance this widget creates
    pub fn with_crosshair_handler(mut self, handler: CrosshairHandler) -> Self {
        self.crosshair_handler = Some(handler);
        self
    }

    pub fn mount(&mut self) -> ChartResult<()> {
        if self.series.is_mounted() {
            return Ok(());
        }
        self.series.mount(&mut self.factory, self.crosshair_handler.clone())?;
        self.refresh_overlays();
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.series.is_mounted()
    }

    pub fn update_candles(&mut self, candles: Vec<Candle>) {
        if self.series.set_candles(candles) {
            self.refresh_overlays();
        }
    }

    /// Returns `true` when the hover state changed as a result
    pub fn update_positions(&mut self, positions: Vec<OpenPosition>) -> bool {
        self.positions = positions;
        self.refresh_overlays();
        self.hover.on_positions_changed(&self.positions)
    }

    pub fn update_ticker(&mut self, ticker: Option<Ticker>) {
        self.ticker = ticker;
        self.refresh_overlays();
    }

    /// Recreate the chart with the new colors. The viewport and all
    /// overlays carry over to the new instance.
    pub fn set_theme(&mut self, theme: Theme) -> ChartResult<()> {
        if theme == self.series.theme() {
            return Ok(());
        }
        self.series.set_theme(theme);
        if !self.series.is_mounted() {
            return Ok(());
        }

        log_info!(LogComponent::Application("PositionChart"), "switching theme to {}", theme);
        let range = self.series.visible_logical_range();
        self.teardown();
        self.hover.reset();
        self.series.mount(&mut self.factory, self.crosshair_handler.clone())?;
        self.series.restore_logical_range(range);
        self.refresh_overlays();
        Ok(())
    }

    pub fn set_symbol(&mut self, symbol: Symbol) {
        if &symbol == self.series.symbol() {
            return;
        }
        self.series.set_symbol(symbol);
        self.hover.reset();
    }

    /// Match the chart size to the container
    pub fn resize(&mut self) {
        let (width, height) = self.factory.container_size();
        self.series.resize(width, height);
    }

    /// Returns `true` when the hover state changed
    pub fn handle_crosshair(&mut self, event: CrosshairEvent) -> bool {
        match self.series.surface() {
            Some(surface) => self.hover.on_crosshair_move(&event, &self.positions, surface),
            None => self.hover.reset(),
        }
    }

    /// Apply one snapshot from the feed. Returns `true` when the hover state
    /// changed.
    pub fn apply(&mut self, snapshot: MarketSnapshot) -> bool {
        match snapshot {
            MarketSnapshot::Candles(candles) => {
                self.update_candles(candles);
                false
            }
            MarketSnapshot::Ticker(ticker) => {
                self.update_ticker(ticker);
                false
            }
            MarketSnapshot::Positions(positions) => self.update_positions(positions),
        }
    }

    /// Release every price line, then the chart. Safe to call repeatedly.
    pub fn unmount(&mut self) -> bool {
        self.hover.reset();
        self.teardown()
    }

    pub fn hover_state(&self) -> &HoverState {
        self.hover.state()
    }

    pub fn tooltip(&self) -> Option<PositionTooltip> {
        PositionTooltip::from_state(self.hover.state(), self.series.latest_price())
    }

    pub fn price_line_count(&self) -> usize {
        self.overlay.line_count()
    }

    pub fn positions(&self) -> &[OpenPosition] {
        &self.positions
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn series(&self) -> &PriceSeriesView<F::Surface> {
        &self.series
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.series.surface()
    }

    pub fn surface_mut(&mut self) -> Option<&mut F::Surface> {
        self.series.surface_mut()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    fn refresh_overlays(&mut self) {
        let latest = self.series.latest_price();
        if let Some(surface) = self.series.surface_mut() {
            self.overlay.recompute(surface, &self.positions, latest, self.ticker.as_ref());
        }
    }

    fn teardown(&mut self) -> bool {
        if let Some(surface) = self.series.surface_mut() {
            self.overlay.release_all(surface);
        }
        self.series.dispose()
    }
}

impl<F: ChartFactory> Drop for PositionChart<F> {
    fn drop(&mut self) {
        self.unmount();
    }
}

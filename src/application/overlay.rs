use crate::config::OverlayConfig;
use crate::domain::{
    chart::{ChartSurface, LineStyle, PriceLineOptions},
    logging::LogComponent,
    market_data::{Price, Ticker},
    trading::{OpenPosition, Side, position_label},
};
use crate::{log_trace, log_warn};

/// Lines to draw for the given inputs: one dashed line per position, then
/// the ticker marker unless it sits on top of an entry price.
pub fn plan_overlays(
    positions: &[OpenPosition],
    latest_price: Option<Price>,
    ticker: Option<&Ticker>,
    config: &OverlayConfig,
) -> Vec<PriceLineOptions> {
    let mut plan: Vec<PriceLineOptions> = positions
        .iter()
        .map(|position| PriceLineOptions {
            price: position.entry_price,
            color: match position.side {
                Side::Long => config.long_color,
                Side::Short => config.short_color,
            },
            line_width: config.line_width,
            line_style: LineStyle::Dashed,
            axis_label_visible: true,
            title: position_label(position, latest_price),
        })
        .collect();

    if let Some(ticker) = ticker {
        if !collides_with_entry(ticker.last_price, positions, config.collision_epsilon) {
            plan.push(PriceLineOptions {
                price: ticker.last_price,
                color: if ticker.is_up() { config.long_color } else { config.short_color },
                line_width: 1,
                line_style: LineStyle::Solid,
                axis_label_visible: true,
                title: String::new(),
            });
        }
    }

    plan
}

fn collides_with_entry(price: Price, positions: &[OpenPosition], epsilon: f64) -> bool {
    positions.iter().any(|p| p.entry_price.distance_to(price) < epsilon)
}

/// Owns the price lines drawn for open positions.
///
/// Every recompute removes all tracked lines and creates the new set from
/// scratch; lines are never patched in place.
pub struct PositionOverlayManager<L> {
    lines: Vec<L>,
    config: OverlayConfig,
}

impl<L> PositionOverlayManager<L> {
    pub fn new(config: OverlayConfig) -> Self {
        Self { lines: Vec::new(), config }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Redraw all overlays, keeping the visible range where the user left it.
    /// Returns the number of lines now on the chart.
    pub fn recompute<S>(
        &mut self,
        surface: &mut S,
        positions: &[OpenPosition],
        latest_price: Option<Price>,
        ticker: Option<&Ticker>,
    ) -> usize
    where
        S: ChartSurface<PriceLine = L>,
    {
        let range = surface.visible_logical_range();

        self.release_all(surface);

        let plan = plan_overlays(positions, latest_price, ticker, &self.config);
        self.lines = plan.iter().map(|options| surface.create_price_line(options)).collect();

        if let Some(range) = range {
            surface.set_visible_logical_range(range);
        }

        log_trace!(
            LogComponent::Application("Overlay"),
            "{} price lines for {} positions",
            self.lines.len(),
            positions.len()
        );
        self.lines.len()
    }

    /// Remove every tracked line. Lines the chart already disposed are logged
    /// and dropped. Returns how many removals succeeded.
    pub fn release_all<S>(&mut self, surface: &mut S) -> usize
    where
        S: ChartSurface<PriceLine = L>,
    {
        let mut removed = 0;
        for line in self.lines.drain(..) {
            match surface.remove_price_line(&line) {
                Ok(()) => removed += 1,
                Err(e) => {
                    log_warn!(LogComponent::Application("Overlay"), "Ignoring price line removal failure: {}", e);
                }
            }
        }
        removed
    }
}

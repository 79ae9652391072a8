//! Widget configuration.
//!
//! Every section is `#[serde(default)]`, so a partial JSON document only
//! overrides the fields it names.

use serde::Deserialize;

use crate::domain::chart::Color;
use crate::domain::errors::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub overlay: OverlayConfig,
    pub hover: HoverConfig,
    pub feed: FeedConfig,
}

impl ChartConfig {
    pub fn from_json(raw: &str) -> ChartResult<Self> {
        let config: ChartConfig = serde_json::from_str(raw)
            .map_err(|e| ChartError::Configuration(format!("Invalid chart config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(self.overlay.collision_epsilon >= 0.0) {
            return Err(ChartError::Configuration("collisionEpsilon must be >= 0".to_string()));
        }
        if self.overlay.line_width == 0 {
            return Err(ChartError::Configuration("lineWidth must be > 0".to_string()));
        }
        if !(self.hover.price_band > 0.0) || !(self.hover.pixel_band > 0.0) {
            return Err(ChartError::Configuration("hover bands must be > 0".to_string()));
        }
        if self.feed.poll_interval_ms == 0 {
            return Err(ChartError::Configuration("pollIntervalMs must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Price-line overlay settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Ticker marker is dropped when it is closer than this to an entry price
    pub collision_epsilon: f64,
    pub line_width: u8,
    pub long_color: Color,
    pub short_color: Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            collision_epsilon: 0.01,
            line_width: 2,
            long_color: Color::from_hex(0x26A69A),
            short_color: Color::from_hex(0xEF5350),
        }
    }
}

/// Hover matching bands
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoverConfig {
    /// Max distance, in price units, between the crosshair price and an entry
    pub price_band: f64,
    /// Max horizontal distance, in pixels, to the position's entry bar
    pub pixel_band: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self { price_band: 100.0, pixel_band: 50.0 }
    }
}

/// Snapshot polling endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedConfig {
    pub candles_url: Option<String>,
    pub ticker_url: Option<String>,
    pub positions_url: Option<String>,
    pub poll_interval_ms: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { candles_url: None, ticker_url: None, positions_url: None, poll_interval_ms: 5_000 }
    }
}

use super::value_objects::{Price, Timestamp};
use serde::{Deserialize, Serialize};

/// Domain entity - Candle
///
/// Field names match the bar format the chart series accepts, so a slice of
/// candles serializes straight into a `setData` payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl Candle {
    pub fn new(time: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self { time, open, high, low, close }
    }
}

/// Domain entity - Ticker, the latest quote snapshot for a symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub last_price: Price,
    pub price_change: f64,
    pub price_change_percent: f64,
}

impl Ticker {
    pub fn new(last_price: Price, price_change: f64, price_change_percent: f64) -> Self {
        Self { last_price, price_change, price_change_percent }
    }

    /// Zero change counts as up, matching how the marker is colored
    pub fn is_up(&self) -> bool {
        self.price_change >= 0.0
    }
}

/// Ordered candle snapshot, replaced wholesale on every refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.time);
        // Later copies of a bar are fresher updates of it
        candles.dedup_by(|later, kept| {
            if later.time == kept.time {
                *kept = *later;
                true
            } else {
                false
            }
        });
        Self { candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn count(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Close of the newest bar
    pub fn latest_price(&self) -> Option<Price> {
        self.latest().map(|c| c.close)
    }

    /// Index of the bar covering `time` (the last bar opened at or before it)
    pub fn index_at_or_before(&self, time: Timestamp) -> Option<usize> {
        match self.candles.binary_search_by_key(&time, |c| c.time) {
            Ok(idx) => Some(idx),
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }

    pub fn price_range(&self) -> Option<(Price, Price)> {
        let first = self.candles.first()?;
        let mut min_price = first.low;
        let mut max_price = first.high;
        for candle in &self.candles {
            if candle.low < min_price {
                min_price = candle.low;
            }
            if candle.high > max_price {
                max_price = candle.high;
            }
        }
        Some((min_price, max_price))
    }
}

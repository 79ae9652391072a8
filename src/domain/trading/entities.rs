use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::domain::market_data::{Price, Symbol, Timestamp};

/// Direction of an open trade
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(try_from = "String", into = "String")]
pub enum Side {
    #[display(fmt = "Long")]
    #[strum(to_string = "long", serialize = "buy")]
    Long,
    #[display(fmt = "Short")]
    #[strum(to_string = "short", serialize = "sell")]
    Short,
}

impl Side {
    /// +1 for Long, -1 for Short
    pub fn direction(&self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

impl TryFrom<String> for Side {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Side> for String {
    fn from(side: Side) -> Self {
        side.as_ref().to_string()
    }
}

/// A user's active trade as reported by the trading backend.
///
/// The widget never mutates positions; it only reads the latest snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub id: String,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: f64,
    pub entry_price: Price,
    #[serde(default)]
    pub initial_margin: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<Price>,
    #[serde(default)]
    pub take_profit: Option<Price>,
    #[serde(default)]
    pub entry_time: Option<Timestamp>,
}

impl OpenPosition {
    pub fn new(id: impl Into<String>, symbol: Symbol, side: Side, quantity: f64, entry_price: Price) -> Self {
        Self {
            id: id.into(),
            symbol,
            side,
            quantity,
            entry_price,
            initial_margin: None,
            stop_loss: None,
            take_profit: None,
            entry_time: None,
        }
    }

    pub fn with_entry_time(mut self, time: Timestamp) -> Self {
        self.entry_time = Some(time);
        self
    }

    pub fn with_initial_margin(mut self, margin: f64) -> Self {
        self.initial_margin = Some(margin);
        self
    }

    pub fn with_stop_loss(mut self, price: Price) -> Self {
        self.stop_loss = Some(price);
        self
    }

    pub fn with_take_profit(mut self, price: Price) -> Self {
        self.take_profit = Some(price);
        self
    }

    /// Unrealized P&L against `latest`. Positive means profit.
    ///
    /// Without a price (no candles loaded yet) the result is 0.
    pub fn unrealized_pnl(&self, latest: Option<Price>) -> f64 {
        match latest {
            Some(price) => (price.value() - self.entry_price.value()) * self.quantity * self.side.direction(),
            None => 0.0,
        }
    }

    /// Return on the initial margin, in percent
    pub fn roe_percent(&self, latest: Option<Price>) -> Option<f64> {
        let margin = self.initial_margin.filter(|m| *m > 0.0)?;
        Some(self.unrealized_pnl(latest) / margin * 100.0)
    }
}

//! Wire formats of the snapshot endpoints.
//!
//! Numbers are accepted either as JSON numbers or as decimal strings, the
//! way exchange APIs usually send prices.

use serde::Deserialize;

use crate::domain::{
    errors::{ChartError, ChartResult},
    market_data::{Candle, Price, Symbol, Ticker, Timestamp},
    trading::{OpenPosition, Side},
};

/// Timestamps above this are taken as milliseconds
const MILLIS_THRESHOLD: f64 = 100_000_000_000.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn to_f64(&self, field: &str) -> ChartResult<f64> {
        let value = match self {
            NumberOrString::Number(n) => *n,
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ChartError::Decode(format!("{} is not a number: '{}'", field, s)))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ChartError::Decode(format!("{} is not finite", field)))
        }
    }
}

fn to_timestamp(raw: &NumberOrString, field: &str) -> ChartResult<Timestamp> {
    let value = raw.to_f64(field)?;
    if value < 0.0 {
        return Err(ChartError::Decode(format!("{} is negative", field)));
    }
    if value >= MILLIS_THRESHOLD {
        Ok(Timestamp::from_millis(value as u64))
    } else {
        Ok(Timestamp::from(value as u64))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandleDto {
    pub time: NumberOrString,
    pub open: NumberOrString,
    pub high: NumberOrString,
    pub low: NumberOrString,
    pub close: NumberOrString,
}

impl CandleDto {
    pub fn into_domain(self) -> ChartResult<Candle> {
        Ok(Candle::new(
            to_timestamp(&self.time, "time")?,
            Price::from(self.open.to_f64("open")?),
            Price::from(self.high.to_f64("high")?),
            Price::from(self.low.to_f64("low")?),
            Price::from(self.close.to_f64("close")?),
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerDto {
    pub last_price: NumberOrString,
    #[serde(default)]
    pub price_change: Option<NumberOrString>,
    #[serde(default)]
    pub price_change_percent: Option<NumberOrString>,
}

impl TickerDto {
    pub fn into_domain(self) -> ChartResult<Ticker> {
        let optional = |raw: &Option<NumberOrString>, field: &str| -> ChartResult<f64> {
            raw.as_ref().map(|v| v.to_f64(field)).transpose().map(|v| v.unwrap_or(0.0))
        };
        Ok(Ticker::new(
            Price::from(self.last_price.to_f64("lastPrice")?),
            optional(&self.price_change, "priceChange")?,
            optional(&self.price_change_percent, "priceChangePercent")?,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub id: NumberOrString,
    pub symbol: String,
    pub side: String,
    pub quantity: NumberOrString,
    #[serde(alias = "entry_price")]
    pub entry_price: NumberOrString,
    #[serde(default, alias = "initial_margin")]
    pub initial_margin: Option<NumberOrString>,
    #[serde(default, alias = "stop_loss")]
    pub stop_loss: Option<NumberOrString>,
    #[serde(default, alias = "take_profit")]
    pub take_profit: Option<NumberOrString>,
    #[serde(default, alias = "entry_time")]
    pub entry_time: Option<NumberOrString>,
}

impl PositionDto {
    pub fn into_domain(self) -> ChartResult<OpenPosition> {
        let id = match &self.id {
            NumberOrString::Number(n) => format!("{}", n),
            NumberOrString::Text(s) => s.clone(),
        };
        let side: Side = self.side.parse()?;
        let mut position = OpenPosition::new(
            id,
            Symbol::new(self.symbol)?,
            side,
            self.quantity.to_f64("quantity")?,
            Price::from(self.entry_price.to_f64("entryPrice")?),
        );
        position.initial_margin = self.initial_margin.map(|v| v.to_f64("initialMargin")).transpose()?;
        position.stop_loss = self.stop_loss.map(|v| v.to_f64("stopLoss").map(Price::from)).transpose()?;
        position.take_profit = self.take_profit.map(|v| v.to_f64("takeProfit").map(Price::from)).transpose()?;
        position.entry_time = self.entry_time.map(|v| to_timestamp(&v, "entryTime")).transpose()?;
        Ok(position)
    }
}

pub fn parse_candles(raw: &str) -> ChartResult<Vec<Candle>> {
    let dtos: Vec<CandleDto> = serde_json::from_str(raw)?;
    dtos.into_iter().map(CandleDto::into_domain).collect()
}

pub fn parse_ticker(raw: &str) -> ChartResult<Ticker> {
    let dto: TickerDto = serde_json::from_str(raw)?;
    dto.into_domain()
}

pub fn parse_positions(raw: &str) -> ChartResult<Vec<OpenPosition>> {
    let dtos: Vec<PositionDto> = serde_json::from_str(raw)?;
    dtos.into_iter().map(PositionDto::into_domain).collect()
}

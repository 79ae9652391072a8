#![allow(dead_code)]

use position_chart_wasm::config::ChartConfig;
use position_chart_wasm::domain::{
    chart::Theme,
    market_data::{Candle, Price, Symbol, Ticker, Timestamp},
    trading::{OpenPosition, Side},
};
use position_chart_wasm::infrastructure::charting::HeadlessChartFactory;
use position_chart_wasm::PositionChart;

pub const START: u64 = 1_700_000_000;
pub const BAR: u64 = 60;

pub fn bar_time(index: u64) -> Timestamp {
    Timestamp::from(START + index * BAR)
}

/// `count` one-minute bars closing at 100, 101, 102, ...
pub fn candles(count: u64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = 100.0 + i as f64;
            Candle::new(
                bar_time(i),
                Price::from(close - 0.5),
                Price::from(close + 1.0),
                Price::from(close - 1.5),
                Price::from(close),
            )
        })
        .collect()
}

pub fn position(id: &str, side: Side, quantity: f64, entry: f64) -> OpenPosition {
    OpenPosition::new(id, Symbol::from("BTCUSDT"), side, quantity, Price::from(entry))
}

pub fn ticker(last: f64, change: f64) -> Ticker {
    Ticker::new(Price::from(last), change, 0.0)
}

pub fn chart() -> PositionChart<HeadlessChartFactory> {
    PositionChart::new(HeadlessChartFactory::new(600, 400), ChartConfig::default(), Theme::Dark, Symbol::from("BTCUSDT"))
}

pub fn mounted_chart() -> PositionChart<HeadlessChartFactory> {
    let mut chart = chart();
    chart.mount().expect("headless mount");
    chart
}

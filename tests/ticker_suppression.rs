mod common;

use common::{candles, mounted_chart, position, ticker};
use position_chart_wasm::application::plan_overlays;
use position_chart_wasm::config::OverlayConfig;
use position_chart_wasm::domain::{
    chart::LineStyle,
    trading::Side,
};

#[test]
fn ticker_on_entry_price_is_hidden() {
    let positions = vec![position("1", Side::Long, 1.0, 100.0)];
    let plan = plan_overlays(&positions, None, Some(&ticker(100.005, 1.0)), &OverlayConfig::default());
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].line_style, LineStyle::Dashed);
}

#[test]
fn marker_within_a_cent_of_entry_is_suppressed() {
    let positions = vec![position("1", Side::Long, 0.1, 50_000.0)];
    let config = OverlayConfig::default();
    assert_eq!(plan_overlays(&positions, None, Some(&ticker(50_000.005, 1.0)), &config).len(), 1);
    assert_eq!(plan_overlays(&positions, None, Some(&ticker(50_100.0, 1.0)), &config).len(), 2);
}

#[test]
fn ticker_away_from_entries_is_drawn_last() {
    let positions = vec![position("1", Side::Long, 1.0, 100.0), position("2", Side::Short, 1.0, 120.0)];
    let plan = plan_overlays(&positions, None, Some(&ticker(100.02, 1.0)), &OverlayConfig::default());
    assert_eq!(plan.len(), 3);
    let marker = &plan[2];
    assert_eq!(marker.line_style, LineStyle::Solid);
    assert_eq!(marker.line_width, 1);
    assert!(marker.title.is_empty());
}

#[test]
fn marker_color_follows_daily_change() {
    let config = OverlayConfig::default();
    let up = plan_overlays(&[], None, Some(&ticker(50.0, 0.0)), &config);
    let down = plan_overlays(&[], None, Some(&ticker(50.0, -3.0)), &config);
    assert_eq!(up[0].color, config.long_color);
    assert_eq!(down[0].color, config.short_color);
}

#[test]
fn epsilon_is_configurable() {
    let positions = vec![position("1", Side::Long, 1.0, 100.0)];
    let config = OverlayConfig { collision_epsilon: 1.0, ..OverlayConfig::default() };
    assert_eq!(plan_overlays(&positions, None, Some(&ticker(100.5, 1.0)), &config).len(), 1);
    assert_eq!(plan_overlays(&positions, None, Some(&ticker(101.5, 1.0)), &config).len(), 2);
}

#[test]
fn chart_redraws_when_ticker_moves_off_entry() {
    let mut chart = mounted_chart();
    chart.update_candles(candles(5));
    chart.update_positions(vec![position("1", Side::Long, 1.0, 100.0)]);

    chart.update_ticker(Some(ticker(100.001, 0.5)));
    assert_eq!(chart.price_line_count(), 1);

    chart.update_ticker(Some(ticker(101.0, 0.5)));
    assert_eq!(chart.price_line_count(), 2);

    chart.update_ticker(None);
    assert_eq!(chart.price_line_count(), 1);
}

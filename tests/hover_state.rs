mod common;

use common::{START, bar_time, candles, mounted_chart, position};
use position_chart_wasm::application::{HoverProximityDetector, HoverState};
use position_chart_wasm::config::HoverConfig;
use position_chart_wasm::domain::{
    chart::{CoordinateSpace, CrosshairEvent, Point},
    market_data::{Price, Timestamp},
    trading::{OpenPosition, Side},
};

/// 10 px per one-minute bar, price axis flipped around 400
struct Linear;

impl CoordinateSpace for Linear {
    fn time_to_coordinate(&self, time: Timestamp) -> Option<f64> {
        (time.value() >= START).then(|| (time.value() - START) as f64 / 6.0)
    }

    fn price_to_coordinate(&self, price: Price) -> Option<f64> {
        Some(400.0 - price.value())
    }
}

fn at_bar(id: &str, entry: f64, bar: u64) -> OpenPosition {
    position(id, Side::Long, 1.0, entry).with_entry_time(bar_time(bar))
}

fn pointer(bar: u64, x: f64, price: f64) -> CrosshairEvent {
    CrosshairEvent::new(bar_time(bar), Point::new(x, 200.0), Price::from(price))
}

fn detector() -> HoverProximityDetector {
    HoverProximityDetector::new(HoverConfig::default())
}

#[test]
fn starts_idle() {
    assert!(detector().state().is_idle());
}

#[test]
fn pointer_near_entry_hovers_with_anchor_on_entry() {
    let positions = vec![at_bar("a", 150.0, 5)];
    let mut hover = detector();

    assert!(hover.on_crosshair_move(&pointer(5, 58.0, 160.0), &positions, &Linear));

    let state = hover.state();
    assert_eq!(state.position().map(|p| p.id.as_str()), Some("a"));
    assert_eq!(state.anchor(), Some(Point::new(50.0, 250.0)));
}

#[test]
fn repeated_match_reports_no_change() {
    let positions = vec![at_bar("a", 150.0, 5)];
    let mut hover = detector();
    hover.on_crosshair_move(&pointer(5, 58.0, 160.0), &positions, &Linear);
    assert!(!hover.on_crosshair_move(&pointer(5, 58.0, 160.0), &positions, &Linear));
}

#[test]
fn moving_between_positions_switches_hover_directly() {
    let a = at_bar("a", 150.0, 5);
    let b = at_bar("b", 400.0, 20);
    let positions = vec![a.clone(), b.clone()];
    let mut hover = detector();

    assert!(hover.on_crosshair_move(&pointer(5, 50.0, 150.0), &positions, &Linear));
    assert_eq!(*hover.state(), HoverState::Hovering { position: a, anchor: Point::new(50.0, 250.0) });

    assert!(hover.on_crosshair_move(&pointer(20, 200.0, 400.0), &positions, &Linear));
    assert_eq!(*hover.state(), HoverState::Hovering { position: b, anchor: Point::new(200.0, 0.0) });
}

#[test]
fn leaving_the_pane_goes_idle() {
    let positions = vec![at_bar("a", 150.0, 5)];
    let mut hover = detector();
    hover.on_crosshair_move(&pointer(5, 58.0, 160.0), &positions, &Linear);

    assert!(hover.on_crosshair_move(&CrosshairEvent::left(), &positions, &Linear));
    assert_eq!(*hover.state(), HoverState::Idle);
}

#[test]
fn price_band_is_inclusive() {
    let positions = vec![at_bar("a", 150.0, 5)];
    let mut hover = detector();
    assert!(hover.on_crosshair_move(&pointer(5, 50.0, 250.0), &positions, &Linear));
    assert!(hover.on_crosshair_move(&pointer(5, 50.0, 250.5), &positions, &Linear));
    assert!(hover.state().is_idle());
}

#[test]
fn pixel_band_limits_horizontal_reach() {
    let positions = vec![at_bar("a", 150.0, 5)];
    let mut hover = detector();
    assert!(!hover.on_crosshair_move(&pointer(11, 110.0, 150.0), &positions, &Linear));
    assert!(hover.on_crosshair_move(&pointer(9, 90.0, 150.0), &positions, &Linear));
}

#[test]
fn positions_without_entry_time_never_match() {
    let positions = vec![position("a", Side::Long, 1.0, 150.0)];
    let mut hover = detector();
    assert!(!hover.on_crosshair_move(&pointer(5, 50.0, 150.0), &positions, &Linear));
}

#[test]
fn time_outside_the_series_is_ignored() {
    let positions = vec![at_bar("a", 150.0, 0)];
    let mut hover = detector();
    let before_first = CrosshairEvent::new(Timestamp::from(START - 60), Point::new(0.0, 0.0), Price::from(150.0));
    assert!(!hover.on_crosshair_move(&before_first, &positions, &Linear));
}

#[test]
fn first_match_wins() {
    let positions = vec![at_bar("first", 150.0, 5), at_bar("second", 151.0, 5)];
    let mut hover = detector();
    hover.on_crosshair_move(&pointer(5, 50.0, 151.0), &positions, &Linear);
    assert_eq!(hover.state().position().map(|p| p.id.as_str()), Some("first"));
}

#[test]
fn empty_positions_stay_idle() {
    let mut hover = detector();
    assert!(!hover.on_crosshair_move(&pointer(5, 50.0, 150.0), &[], &Linear));
    assert!(hover.state().is_idle());
}

#[test]
fn closed_position_clears_hover() {
    let mut hover = detector();
    hover.on_crosshair_move(&pointer(5, 50.0, 150.0), &[at_bar("a", 150.0, 5)], &Linear);

    assert!(hover.on_positions_changed(&[at_bar("b", 150.0, 5)]));
    assert!(hover.state().is_idle());
}

#[test]
fn surviving_position_is_refreshed() {
    let mut hover = detector();
    hover.on_crosshair_move(&pointer(5, 50.0, 150.0), &[at_bar("a", 150.0, 5)], &Linear);

    let mut grown = at_bar("a", 150.0, 5);
    grown.quantity = 3.0;
    assert!(hover.on_positions_changed(&[grown]));
    assert_eq!(hover.state().position().map(|p| p.quantity), Some(3.0));
    assert_eq!(hover.state().anchor(), Some(Point::new(50.0, 250.0)));
}

#[test]
fn position_and_anchor_are_present_together() {
    let positions = vec![at_bar("a", 150.0, 5), at_bar("b", 300.0, 30)];
    let events = [
        pointer(5, 50.0, 150.0),
        pointer(30, 300.0, 299.0),
        CrosshairEvent::left(),
        pointer(5, 400.0, 150.0),
        pointer(30, 290.0, 380.0),
    ];
    let mut hover = detector();
    for event in &events {
        hover.on_crosshair_move(event, &positions, &Linear);
        let state = hover.state();
        assert_eq!(state.position().is_some(), state.anchor().is_some());
    }
}

#[test]
fn chart_hover_uses_live_coordinates() {
    let mut chart = mounted_chart();
    chart.update_candles(candles(11));
    let mut long = at_bar("a", 105.0, 5)
        .with_initial_margin(100.0)
        .with_stop_loss(Price::from(95.0))
        .with_take_profit(Price::from(120.0));
    long.quantity = 2.0;
    chart.update_positions(vec![long]);

    let surface = chart.surface().expect("mounted");
    let x = surface.time_to_coordinate(bar_time(5)).expect("bar on screen");
    let y = surface.price_to_coordinate(Price::from(105.0)).expect("price on scale");

    assert!(chart.handle_crosshair(CrosshairEvent::new(bar_time(5), Point::new(x + 10.0, y), Price::from(104.0))));
    let tooltip = chart.tooltip().expect("hovering");
    assert_eq!(tooltip.anchor, Point::new(x, y));
    assert!(tooltip.is_profit());
    insta::assert_snapshot!(tooltip.text(), @r"
    Long BTCUSDT
    Qty: 2
    Entry: 105.00
    P&L: +10.00
    ROE: +10.00%
    SL: 95.00
    TP: 120.00
    ");

    assert!(chart.update_positions(Vec::new()));
    assert!(chart.tooltip().is_none());
}

#[test]
fn unmounted_chart_never_hovers() {
    let mut chart = mounted_chart();
    chart.update_candles(candles(11));
    chart.update_positions(vec![at_bar("a", 105.0, 5)]);
    chart.unmount();
    assert!(!chart.handle_crosshair(pointer(5, 0.0, 105.0)));
    assert!(chart.hover_state().is_idle());
}

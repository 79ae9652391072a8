mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{bar_time, candles, chart, mounted_chart, position, ticker};
use position_chart_wasm::domain::{
    chart::{CrosshairEvent, Point, Theme},
    market_data::Price,
    trading::Side,
};
use position_chart_wasm::PositionChart;
use position_chart_wasm::infrastructure::charting::{HeadlessChartFactory, SurfaceCall};

fn loaded_chart() -> PositionChart<HeadlessChartFactory> {
    let mut chart = mounted_chart();
    chart.update_candles(candles(10));
    chart.update_ticker(Some(ticker(120.0, 1.0)));
    chart.update_positions(vec![
        position("a", Side::Long, 1.0, 101.0),
        position("b", Side::Short, 1.0, 103.0),
        position("c", Side::Long, 0.5, 105.0),
    ]);
    chart
}

fn removals_precede_dispose(calls: &[SurfaceCall]) -> bool {
    let dispose = calls.iter().position(|c| matches!(c, SurfaceCall::Dispose { .. }));
    let last_remove = calls.iter().rposition(|c| matches!(c, SurfaceCall::RemoveLine { .. }));
    matches!((last_remove, dispose), (Some(r), Some(d)) if r < d)
}

#[test]
fn unmount_releases_every_line_before_dispose() {
    let mut chart = loaded_chart();
    let journal = chart.factory().journal();
    assert_eq!(chart.price_line_count(), 4);
    journal.borrow_mut().calls.clear();

    assert!(chart.unmount());

    let journal = journal.borrow();
    assert_eq!(journal.outstanding_lines(), 0);
    assert_eq!(journal.charts_disposed, 1);
    assert_eq!(journal.stale_removals, 0);
    assert!(removals_precede_dispose(&journal.calls));
    assert!(!chart.is_mounted());
    assert_eq!(chart.price_line_count(), 0);
}

#[test]
fn unmount_twice_is_harmless() {
    let mut chart = loaded_chart();
    let journal = chart.factory().journal();
    assert!(chart.unmount());
    let calls = journal.borrow().calls.len();

    assert!(!chart.unmount());

    assert_eq!(journal.borrow().calls.len(), calls);
    assert_eq!(journal.borrow().charts_disposed, 1);
}

#[test]
fn dropping_the_widget_tears_down() {
    let chart = loaded_chart();
    let journal = chart.factory().journal();
    drop(chart);
    assert_eq!(journal.borrow().outstanding_lines(), 0);
    assert_eq!(journal.borrow().charts_disposed, 1);
}

#[test]
fn theme_change_releases_old_lines_first() {
    let mut chart = loaded_chart();
    let journal = chart.factory().journal();
    journal.borrow_mut().calls.clear();

    chart.set_theme(Theme::Light).expect("remount");

    let calls = journal.borrow().calls.clone();
    assert!(removals_precede_dispose(&calls));
    let dispose = calls.iter().position(|c| matches!(c, SurfaceCall::Dispose { chart: 1 }));
    let create = calls.iter().position(|c| matches!(c, SurfaceCall::CreateChart { chart: 2, .. }));
    assert!(dispose < create);
    assert_eq!(journal.borrow().outstanding_lines(), 4);
    assert_eq!(journal.borrow().stale_removals, 0);
}

#[test]
fn crosshair_subscription_follows_remount() {
    let seen: Rc<RefCell<Vec<CrosshairEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut chart = chart().with_crosshair_handler(Rc::new(move |event: CrosshairEvent| sink.borrow_mut().push(event)));
    chart.mount().expect("mount");
    chart.update_candles(candles(10));

    let event = CrosshairEvent::new(bar_time(3), Point::new(10.0, 10.0), Price::from(103.0));
    chart.surface().expect("mounted").emit_crosshair(event);
    chart.set_theme(Theme::Light).expect("remount");
    chart.surface().expect("remounted").emit_crosshair(CrosshairEvent::left());

    assert_eq!(*seen.borrow(), vec![event, CrosshairEvent::left()]);
    assert!(chart.surface().is_some_and(|s| s.has_crosshair_subscriber()));
}

#[test]
fn updates_before_mount_are_replayed() {
    let mut chart = chart();
    chart.update_candles(candles(10));
    chart.update_positions(vec![position("a", Side::Long, 1.0, 101.0)]);
    assert_eq!(chart.price_line_count(), 0);

    chart.mount().expect("mount");

    let surface = chart.surface().expect("mounted");
    assert_eq!(surface.candles().len(), 10);
    assert_eq!(surface.live_lines().len(), 1);
}

#[test]
fn resize_follows_container() {
    let mut chart = mounted_chart();
    let journal = chart.factory().journal();
    chart.factory_mut().set_container_size(900, 300);

    chart.resize();

    assert!(journal.borrow().calls.contains(&SurfaceCall::Resize { chart: 1, width: 900, height: 300 }));
}

#[test]
fn symbol_change_updates_watermark() {
    let mut chart = mounted_chart();
    chart.set_symbol("ethusdt".into());
    let watermark = chart.surface().and_then(|s| s.options().watermark.clone());
    assert_eq!(watermark.as_deref(), Some("ETHUSDT"));
}

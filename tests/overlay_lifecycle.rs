mod common;

use std::sync::OnceLock;

use common::{candles, mounted_chart, position, ticker};
use position_chart_wasm::domain::{
    logging::{LogLevel, init_logger},
    trading::{OpenPosition, Side},
};
use position_chart_wasm::infrastructure::charting::SurfaceCall;
use position_chart_wasm::infrastructure::services::RingBufferLogger;
use quickcheck_macros::quickcheck;

fn captured_logs() -> &'static RingBufferLogger {
    static LOGGER: OnceLock<RingBufferLogger> = OnceLock::new();
    LOGGER.get_or_init(|| {
        let logger = RingBufferLogger::new(1024, LogLevel::Warn);
        init_logger(Box::new(logger.clone()));
        logger
    })
}

fn positions_at(entries: &[u16]) -> Vec<OpenPosition> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let side = if i % 2 == 0 { Side::Long } else { Side::Short };
            position(&i.to_string(), side, 1.0, *entry as f64)
        })
        .collect()
}

#[quickcheck]
fn one_line_per_position_plus_marker(entries: Vec<u16>, marker: Option<u16>, next: Vec<u16>) -> bool {
    let entries: Vec<u16> = entries.into_iter().take(30).collect();
    let next: Vec<u16> = next.into_iter().take(30).collect();
    let mut chart = mounted_chart();
    let journal = chart.factory().journal();
    chart.update_candles(candles(20));

    // Half-unit offset keeps the marker clear of integer entry prices
    chart.update_ticker(marker.map(|m| ticker(m as f64 + 0.5, 1.0)));
    chart.update_positions(positions_at(&entries));
    let first = chart.price_line_count() == entries.len() + marker.is_some() as usize;

    chart.update_positions(positions_at(&next));
    let expected = next.len() + marker.is_some() as usize;
    let live = chart.surface().map(|s| s.live_lines().len()).unwrap_or_default();

    first
        && chart.price_line_count() == expected
        && live == expected
        && journal.borrow().outstanding_lines() == expected
}

#[test]
fn lines_are_rebuilt_not_patched() {
    let mut chart = mounted_chart();
    let journal = chart.factory().journal();
    chart.update_candles(candles(10));
    chart.update_positions(vec![position("a", Side::Long, 1.0, 101.0), position("b", Side::Short, 2.0, 105.0)]);
    journal.borrow_mut().calls.clear();

    chart.update_positions(vec![position("a", Side::Long, 1.0, 101.0), position("b", Side::Short, 2.0, 105.0)]);

    let calls = journal.borrow().calls.clone();
    let removes = calls.iter().filter(|c| matches!(c, SurfaceCall::RemoveLine { .. })).count();
    let creates = calls.iter().filter(|c| matches!(c, SurfaceCall::CreateLine { .. })).count();
    assert_eq!((removes, creates), (2, 2));
    let last_remove = calls.iter().rposition(|c| matches!(c, SurfaceCall::RemoveLine { .. }));
    let first_create = calls.iter().position(|c| matches!(c, SurfaceCall::CreateLine { .. }));
    assert!(last_remove < first_create);
}

#[test]
fn titles_track_latest_close() {
    let mut chart = mounted_chart();
    chart.update_positions(vec![position("a", Side::Long, 2.0, 100.0)]);
    chart.update_candles(candles(11));

    let titles: Vec<String> =
        chart.surface().map(|s| s.live_lines().iter().map(|l| l.title.clone()).collect()).unwrap_or_default();
    assert_eq!(titles, vec!["Long 2 | P&L +20.00".to_string()]);
}

#[test]
fn candles_with_same_close_keep_lines() {
    let mut chart = mounted_chart();
    let journal = chart.factory().journal();
    chart.update_candles(candles(10));
    chart.update_positions(vec![position("a", Side::Long, 1.0, 100.0)]);
    let created = journal.borrow().lines_created;

    chart.update_candles(candles(10));

    assert_eq!(journal.borrow().lines_created, created);
}

#[test]
fn stale_handles_are_logged_and_skipped() {
    let logs = captured_logs();
    let mut chart = mounted_chart();
    let journal = chart.factory().journal();
    chart.update_candles(candles(10));
    chart.update_positions(vec![position("a", Side::Long, 1.0, 101.0), position("b", Side::Long, 1.0, 102.0)]);

    let first_line = journal
        .borrow()
        .calls
        .iter()
        .find_map(|c| match c {
            SurfaceCall::CreateLine { line, .. } => Some(*line),
            _ => None,
        })
        .expect("a line was created");
    assert!(chart.surface_mut().expect("mounted").expire_line(first_line));

    chart.update_positions(vec![position("c", Side::Short, 3.0, 103.0)]);

    assert_eq!(chart.price_line_count(), 1);
    assert_eq!(journal.borrow().stale_removals, 1);
    assert!(
        logs.lines()
            .iter()
            .any(|l| l.contains("Ignoring price line removal failure") && l.contains(&format!("#{}", first_line)))
    );
}

//! In-memory chart backend.
//!
//! Behaves like the browser library where the widget depends on it:
//! replacing data scrolls to the newest bar, removing a disposed line fails,
//! and coordinates follow the visible logical range. Every call is recorded
//! in a [`ChartJournal`] shared by all charts from one factory.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::domain::{
    chart::{
        ChartFactory, ChartOptions, ChartSurface, CoordinateSpace, CrosshairEvent, CrosshairHandler, LogicalRange,
        PriceLineOptions,
    },
    errors::{ChartError, ChartResult},
    market_data::{Candle, CandleSeries, Price, Timestamp},
};

/// Pixels per bar on the time axis
pub const DEFAULT_BAR_SPACING: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadlessLine(u64);

impl HeadlessLine {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    CreateChart { chart: u32, width: u32, height: u32 },
    SetCandles { chart: u32, count: usize },
    SetRange { chart: u32, range: LogicalRange },
    CreateLine { chart: u32, line: u64 },
    RemoveLine { chart: u32, line: u64 },
    StaleRemoval { chart: u32, line: u64 },
    Resize { chart: u32, width: u32, height: u32 },
    Dispose { chart: u32 },
}

/// Call log shared between a factory and the charts it built
#[derive(Debug, Default)]
pub struct ChartJournal {
    pub calls: Vec<SurfaceCall>,
    pub charts_created: u32,
    pub charts_disposed: u32,
    pub lines_created: usize,
    pub lines_removed: usize,
    pub stale_removals: usize,
    next_line: u64,
}

impl ChartJournal {
    /// Lines created and not yet removed across all charts
    pub fn outstanding_lines(&self) -> usize {
        self.lines_created - self.lines_removed
    }
}

pub struct HeadlessChartFactory {
    width: u32,
    height: u32,
    journal: Rc<RefCell<ChartJournal>>,
}

impl HeadlessChartFactory {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, journal: Rc::new(RefCell::new(ChartJournal::default())) }
    }

    pub fn journal(&self) -> Rc<RefCell<ChartJournal>> {
        Rc::clone(&self.journal)
    }

    /// Simulate the host container changing size
    pub fn set_container_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

impl ChartFactory for HeadlessChartFactory {
    type Surface = HeadlessChart;

    fn create_chart(&mut self, options: &ChartOptions) -> ChartResult<HeadlessChart> {
        let id = {
            let mut journal = self.journal.borrow_mut();
            journal.charts_created += 1;
            let id = journal.charts_created;
            journal.calls.push(SurfaceCall::CreateChart { chart: id, width: options.width, height: options.height });
            id
        };
        Ok(HeadlessChart {
            id,
            options: options.clone(),
            series: CandleSeries::default(),
            range: None,
            lines: BTreeMap::new(),
            crosshair: None,
            disposed: false,
            journal: Rc::clone(&self.journal),
        })
    }

    fn container_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub struct HeadlessChart {
    id: u32,
    options: ChartOptions,
    series: CandleSeries,
    range: Option<LogicalRange>,
    lines: BTreeMap<u64, PriceLineOptions>,
    crosshair: Option<CrosshairHandler>,
    disposed: bool,
    journal: Rc<RefCell<ChartJournal>>,
}

impl HeadlessChart {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn candles(&self) -> &[Candle] {
        self.series.candles()
    }

    /// Lines currently drawn, in creation order
    pub fn live_lines(&self) -> Vec<&PriceLineOptions> {
        self.lines.values().collect()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn has_crosshair_subscriber(&self) -> bool {
        self.crosshair.is_some()
    }

    /// Bars that fit into the pane at the default spacing
    pub fn bars_per_pane(&self) -> f64 {
        (self.options.width as f64 / DEFAULT_BAR_SPACING).floor().max(1.0)
    }

    /// Drop a line on the library side, as a teardown race would
    pub fn expire_line(&mut self, line: u64) -> bool {
        self.lines.remove(&line).is_some()
    }

    /// Deliver a crosshair event to the subscribed handler
    pub fn emit_crosshair(&self, event: CrosshairEvent) {
        if let Some(handler) = &self.crosshair {
            handler(event);
        }
    }

    fn record(&self, call: SurfaceCall) {
        self.journal.borrow_mut().calls.push(call);
    }

    fn bar_spacing(&self) -> f64 {
        match self.range {
            Some(range) if range.width() > 0.0 => self.options.width as f64 / range.width(),
            _ => DEFAULT_BAR_SPACING,
        }
    }
}

impl CoordinateSpace for HeadlessChart {
    fn time_to_coordinate(&self, time: Timestamp) -> Option<f64> {
        if self.disposed {
            return None;
        }
        let range = self.range?;
        let index = self.series.index_at_or_before(time)?;
        Some((index as f64 - range.from) * self.bar_spacing())
    }

    fn price_to_coordinate(&self, price: Price) -> Option<f64> {
        if self.disposed {
            return None;
        }
        let (low, high) = self.series.price_range()?;
        let span = high.value() - low.value();
        if span <= 0.0 {
            return None;
        }
        Some((high.value() - price.value()) / span * self.options.height as f64)
    }
}

impl ChartSurface for HeadlessChart {
    type PriceLine = HeadlessLine;

    fn set_candles(&mut self, candles: &[Candle]) {
        self.series = CandleSeries::new(candles.to_vec());
        // The library jumps to the newest bar whenever the data is replaced
        self.range = if self.series.is_empty() {
            None
        } else {
            let last = (self.series.count() - 1) as f64;
            Some(LogicalRange::new(last - self.bars_per_pane() + 1.0, last))
        };
        self.record(SurfaceCall::SetCandles { chart: self.id, count: self.series.count() });
    }

    fn visible_logical_range(&self) -> Option<LogicalRange> {
        self.range
    }

    fn set_visible_logical_range(&mut self, range: LogicalRange) {
        self.range = Some(range);
        self.record(SurfaceCall::SetRange { chart: self.id, range });
    }

    fn create_price_line(&mut self, options: &PriceLineOptions) -> HeadlessLine {
        let line = {
            let mut journal = self.journal.borrow_mut();
            journal.next_line += 1;
            journal.lines_created += 1;
            let line = journal.next_line;
            journal.calls.push(SurfaceCall::CreateLine { chart: self.id, line });
            HeadlessLine(line)
        };
        self.lines.insert(line.0, options.clone());
        line
    }

    fn remove_price_line(&mut self, line: &HeadlessLine) -> ChartResult<()> {
        if self.disposed || self.lines.remove(&line.0).is_none() {
            let mut journal = self.journal.borrow_mut();
            journal.stale_removals += 1;
            journal.calls.push(SurfaceCall::StaleRemoval { chart: self.id, line: line.0 });
            return Err(ChartError::StaleHandle(format!("price line #{} is already disposed", line.0)));
        }
        let mut journal = self.journal.borrow_mut();
        journal.lines_removed += 1;
        journal.calls.push(SurfaceCall::RemoveLine { chart: self.id, line: line.0 });
        Ok(())
    }

    fn subscribe_crosshair_move(&mut self, handler: CrosshairHandler) {
        self.crosshair = Some(handler);
    }

    fn set_watermark(&mut self, text: &str) {
        self.options.watermark = Some(text.to_string());
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.options.width = width;
        self.options.height = height;
        self.record(SurfaceCall::Resize { chart: self.id, width, height });
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.crosshair = None;
        self.lines.clear();
        let mut journal = self.journal.borrow_mut();
        journal.charts_disposed += 1;
        journal.calls.push(SurfaceCall::Dispose { chart: self.id });
    }
}

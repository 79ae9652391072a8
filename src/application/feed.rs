use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::cell::RefCell;
use std::rc::Rc;

use super::hover::PositionTooltip;
use super::position_chart::PositionChart;
use crate::domain::{
    chart::ChartFactory,
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::{Candle, Ticker},
    trading::OpenPosition,
};
use crate::log_debug;

/// One atomic delivery from the market data side. Each variant replaces the
/// corresponding input wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketSnapshot {
    Candles(Vec<Candle>),
    Ticker(Option<Ticker>),
    Positions(Vec<OpenPosition>),
}

impl MarketSnapshot {
    pub fn kind(&self) -> &'static str {
        match self {
            MarketSnapshot::Candles(_) => "candles",
            MarketSnapshot::Ticker(_) => "ticker",
            MarketSnapshot::Positions(_) => "positions",
        }
    }
}

/// Publishing side of the snapshot channel
#[derive(Debug, Clone)]
pub struct SnapshotSender {
    inner: UnboundedSender<MarketSnapshot>,
}

impl SnapshotSender {
    pub fn publish(&self, snapshot: MarketSnapshot) -> ChartResult<()> {
        self.inner
            .unbounded_send(snapshot)
            .map_err(|e| ChartError::Backend(format!("snapshot channel closed: {}", e)))
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

pub type SnapshotReceiver = UnboundedReceiver<MarketSnapshot>;

pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    let (inner, receiver) = unbounded();
    (SnapshotSender { inner }, receiver)
}

/// Apply everything already queued without waiting. Returns the count applied.
pub fn drain_pending<F: ChartFactory>(receiver: &mut SnapshotReceiver, chart: &mut PositionChart<F>) -> usize {
    let mut applied = 0;
    while let Ok(snapshot) = receiver.try_recv() {
        chart.apply(snapshot);
        applied += 1;
    }
    applied
}

/// Apply snapshots in arrival order until every sender is dropped. The
/// callback receives the new tooltip after the chart borrow is released, so it
/// may read the chart again.
pub async fn run_feed<F, C>(mut receiver: SnapshotReceiver, chart: Rc<RefCell<PositionChart<F>>>, mut on_hover_change: C)
where
    F: ChartFactory,
    C: FnMut(Option<PositionTooltip>),
{
    while let Some(snapshot) = receiver.next().await {
        log_debug!(LogComponent::Application("Feed"), "applying {} snapshot", snapshot.kind());
        let changed = {
            let mut guard = chart.borrow_mut();
            guard.apply(snapshot).then(|| guard.tooltip())
        };
        if let Some(tooltip) = changed {
            on_hover_change(tooltip);
        }
    }
    log_debug!(LogComponent::Application("Feed"), "snapshot feed closed");
}

//! Widget logic: series lifecycle, position overlays, hover matching and the
//! controller that ties them to one chart instance.

pub mod feed;
pub mod hover;
pub mod overlay;
pub mod position_chart;
pub mod price_series_view;

pub use feed::{MarketSnapshot, SnapshotReceiver, SnapshotSender, drain_pending, run_feed, snapshot_channel};
pub use hover::{HoverProximityDetector, HoverState, PositionTooltip};
pub use overlay::{PositionOverlayManager, plan_overlays};
pub use position_chart::PositionChart;
pub use price_series_view::PriceSeriesView;

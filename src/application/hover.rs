use crate::config::HoverConfig;
use crate::domain::{
    chart::{CoordinateSpace, CrosshairEvent, Point},
    logging::LogComponent,
    market_data::Price,
    trading::{OpenPosition, format_price, format_quantity, format_signed_amount},
};
use crate::log_trace;

/// Tooltip state. A position and its anchor are either both present or
/// both absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering { position: OpenPosition, anchor: Point },
}

impl HoverState {
    pub fn is_idle(&self) -> bool {
        matches!(self, HoverState::Idle)
    }

    pub fn position(&self) -> Option<&OpenPosition> {
        match self {
            HoverState::Hovering { position, .. } => Some(position),
            HoverState::Idle => None,
        }
    }

    pub fn anchor(&self) -> Option<Point> {
        match self {
            HoverState::Hovering { anchor, .. } => Some(*anchor),
            HoverState::Idle => None,
        }
    }
}

/// Matches crosshair movement against open positions.
///
/// Has no effect on the chart; it only tracks which position, if any, the
/// tooltip should describe.
#[derive(Debug, Clone, Default)]
pub struct HoverProximityDetector {
    config: HoverConfig,
    state: HoverState,
}

impl HoverProximityDetector {
    pub fn new(config: HoverConfig) -> Self {
        Self { config, state: HoverState::Idle }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    /// Feed one crosshair event. Returns `true` when the state changed.
    pub fn on_crosshair_move<C>(&mut self, event: &CrosshairEvent, positions: &[OpenPosition], coords: &C) -> bool
    where
        C: CoordinateSpace + ?Sized,
    {
        let next = self.resolve(event, positions, coords).unwrap_or_default();
        self.transition(next)
    }

    /// Keep the state consistent with a new position snapshot: a hovered
    /// position that was closed clears the tooltip.
    pub fn on_positions_changed(&mut self, positions: &[OpenPosition]) -> bool {
        let next = match &self.state {
            HoverState::Idle => return false,
            HoverState::Hovering { position, anchor } => match positions.iter().find(|p| p.id == position.id) {
                Some(fresh) => HoverState::Hovering { position: fresh.clone(), anchor: *anchor },
                None => HoverState::Idle,
            },
        };
        self.transition(next)
    }

    pub fn reset(&mut self) -> bool {
        self.transition(HoverState::Idle)
    }

    fn resolve<C>(&self, event: &CrosshairEvent, positions: &[OpenPosition], coords: &C) -> Option<HoverState>
    where
        C: CoordinateSpace + ?Sized,
    {
        let time = event.time?;
        let point = event.point?;
        coords.time_to_coordinate(time)?;
        let price = event.price?;

        positions.iter().find_map(|position| {
            if position.entry_price.distance_to(price) > self.config.price_band {
                return None;
            }
            let position_x = coords.time_to_coordinate(position.entry_time?)?;
            if (point.x - position_x).abs() > self.config.pixel_band {
                return None;
            }
            let anchor_y = coords.price_to_coordinate(position.entry_price).unwrap_or(point.y);
            Some(HoverState::Hovering { position: position.clone(), anchor: Point::new(position_x, anchor_y) })
        })
    }

    fn transition(&mut self, next: HoverState) -> bool {
        if self.state == next {
            return false;
        }
        log_trace!(
            LogComponent::Application("Hover"),
            "hover -> {}",
            next.position().map(|p| p.id.as_str()).unwrap_or("idle")
        );
        self.state = next;
        true
    }
}

/// Text shown next to a hovered position
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTooltip {
    pub title: String,
    pub lines: Vec<String>,
    pub pnl: f64,
    pub anchor: Point,
}

impl PositionTooltip {
    pub fn new(position: &OpenPosition, latest_price: Option<Price>, anchor: Point) -> Self {
        let pnl = position.unrealized_pnl(latest_price);
        let mut lines = vec![
            format!("Qty: {}", format_quantity(position.quantity)),
            format!("Entry: {}", format_price(position.entry_price)),
            format!("P&L: {}", format_signed_amount(pnl)),
        ];
        if let Some(roe) = position.roe_percent(latest_price) {
            lines.push(format!("ROE: {}%", format_signed_amount(roe)));
        }
        if let Some(stop_loss) = position.stop_loss {
            lines.push(format!("SL: {}", format_price(stop_loss)));
        }
        if let Some(take_profit) = position.take_profit {
            lines.push(format!("TP: {}", format_price(take_profit)));
        }

        Self { title: format!("{} {}", position.side, position.symbol), lines, pnl, anchor }
    }

    pub fn from_state(state: &HoverState, latest_price: Option<Price>) -> Option<Self> {
        match state {
            HoverState::Hovering { position, anchor } => Some(Self::new(position, latest_price, *anchor)),
            HoverState::Idle => None,
        }
    }

    pub fn is_profit(&self) -> bool {
        self.pnl >= 0.0
    }

    pub fn text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

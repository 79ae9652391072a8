use leptos::html::Div;
use leptos::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::application::{PositionChart, PositionTooltip};
use crate::config::ChartConfig;
use crate::domain::{
    chart::{CrosshairEvent, CrosshairHandler, Theme},
    logging::LogComponent,
    market_data::{Candle, Symbol, Ticker},
    trading::OpenPosition,
};
use crate::event_utils::on_window_resize;
use crate::infrastructure::charting::LightweightChartFactory;
use crate::time_utils::entry_time_line;
use crate::{log_debug, log_error};

type ChartCell = Rc<RefCell<Option<PositionChart<LightweightChartFactory>>>>;
type WeakChartCell = Weak<RefCell<Option<PositionChart<LightweightChartFactory>>>>;

/// Hover tooltip contents plus the entry time row
#[derive(Debug, Clone, PartialEq)]
struct TooltipView {
    tooltip: PositionTooltip,
    opened: Option<String>,
}

impl TooltipView {
    fn from_chart(chart: &PositionChart<LightweightChartFactory>) -> Option<Self> {
        let tooltip = chart.tooltip()?;
        let opened = chart.hover_state().position().and_then(|p| entry_time_line(p.entry_time));
        Some(Self { tooltip, opened })
    }
}

fn crosshair_handler(cell: WeakChartCell, set_tooltip: WriteSignal<Option<TooltipView>>) -> CrosshairHandler {
    Rc::new(move |event: CrosshairEvent| {
        let Some(cell) = cell.upgrade() else {
            return;
        };
        // A callback fired while the chart is being rebuilt is dropped
        let Ok(mut slot) = cell.try_borrow_mut() else {
            return;
        };
        if let Some(chart) = slot.as_mut() {
            if chart.handle_crosshair(event) {
                set_tooltip.set(TooltipView::from_chart(chart));
            }
        }
    })
}

/// Candlestick chart with open positions drawn as price lines and a tooltip
/// for the position under the pointer
#[component]
pub fn PositionChartView(
    #[prop(into)] candles: Signal<Vec<Candle>>,
    #[prop(into)] open_positions: Signal<Vec<OpenPosition>>,
    #[prop(into)] ticker: Signal<Option<Ticker>>,
    #[prop(into)] theme: Signal<Theme>,
    #[prop(into)] symbol: Signal<Symbol>,
    #[prop(optional)] config: ChartConfig,
) -> impl IntoView {
    let container_ref = create_node_ref::<Div>();
    let chart: ChartCell = Rc::new(RefCell::new(None));
    let (tooltip, set_tooltip) = create_signal::<Option<TooltipView>>(None);

    let sync_tooltip = move |chart: &PositionChart<LightweightChartFactory>| {
        let next = TooltipView::from_chart(chart);
        if tooltip.with_untracked(|current| *current != next) {
            set_tooltip.set(next);
        }
    };

    // Mount once the container is in the DOM, replaying whatever data already arrived
    {
        let chart = chart.clone();
        create_effect(move |_| {
            let Some(div) = container_ref.get() else {
                return;
            };
            if chart.borrow().is_some() {
                return;
            }
            let host: web_sys::HtmlElement = (**div).clone();
            let handler = crosshair_handler(Rc::downgrade(&chart), set_tooltip);
            let mut widget = PositionChart::new(
                LightweightChartFactory::new(host),
                config.clone(),
                theme.get_untracked(),
                symbol.get_untracked(),
            )
            .with_crosshair_handler(handler);

            if let Err(e) = widget.mount() {
                log_error!(LogComponent::Presentation("PositionChartView"), "mount failed: {}", e);
                return;
            }
            widget.update_candles(candles.get_untracked());
            widget.update_ticker(ticker.get_untracked());
            widget.update_positions(open_positions.get_untracked());
            *chart.borrow_mut() = Some(widget);
            log_debug!(LogComponent::Presentation("PositionChartView"), "chart mounted");
        });
    }

    {
        let chart = chart.clone();
        create_effect(move |_| {
            let data = candles.get();
            if let Some(widget) = chart.borrow_mut().as_mut() {
                widget.update_candles(data);
                sync_tooltip(widget);
            }
        });
    }

    {
        let chart = chart.clone();
        create_effect(move |_| {
            let data = ticker.get();
            if let Some(widget) = chart.borrow_mut().as_mut() {
                widget.update_ticker(data);
            }
        });
    }

    {
        let chart = chart.clone();
        create_effect(move |_| {
            let data = open_positions.get();
            if let Some(widget) = chart.borrow_mut().as_mut() {
                widget.update_positions(data);
                sync_tooltip(widget);
            }
        });
    }

    {
        let chart = chart.clone();
        create_effect(move |previous: Option<Theme>| {
            let next = theme.get();
            if previous.is_some_and(|p| p != next) {
                if let Some(widget) = chart.borrow_mut().as_mut() {
                    if let Err(e) = widget.set_theme(next) {
                        log_error!(LogComponent::Presentation("PositionChartView"), "theme change failed: {}", e);
                    }
                    sync_tooltip(widget);
                }
            }
            next
        });
    }

    {
        let chart = chart.clone();
        create_effect(move |previous: Option<Symbol>| {
            let next = symbol.get();
            if previous.as_ref().is_some_and(|p| *p != next) {
                if let Some(widget) = chart.borrow_mut().as_mut() {
                    widget.set_symbol(next.clone());
                    sync_tooltip(widget);
                }
            }
            next
        });
    }

    let resize_listener = {
        let chart = chart.clone();
        on_window_resize(move || {
            if let Ok(mut slot) = chart.try_borrow_mut() {
                if let Some(widget) = slot.as_mut() {
                    widget.resize();
                }
            }
        })
    };

    on_cleanup(move || {
        resize_listener.remove();
        let widget = chart.borrow_mut().take();
        if let Some(mut widget) = widget {
            widget.unmount();
        }
    });

    view! {
        <div class="position-chart" style="position: relative; width: 100%; height: 100%;">
            <div class="position-chart-canvas" node_ref=container_ref style="width: 100%; height: 100%;"></div>
            {move || {
                tooltip
                    .get()
                    .map(|content| {
                        let class = if content.tooltip.is_profit() {
                            "position-tooltip profit"
                        } else {
                            "position-tooltip loss"
                        };
                        let style = format!(
                            "position: absolute; left: {}px; top: {}px; pointer-events: none;",
                            content.tooltip.anchor.x + 12.0,
                            content.tooltip.anchor.y + 12.0
                        );
                        view! {
                            <div class=class style=style>
                                <div class="position-tooltip-title">{content.tooltip.title.clone()}</div>
                                {content
                                    .tooltip
                                    .lines
                                    .iter()
                                    .cloned()
                                    .chain(content.opened.clone())
                                    .map(|line| view! { <div class="position-tooltip-line">{line}</div> })
                                    .collect_view()}
                            </div>
                        }
                    })
            }}
        </div>
    }
}

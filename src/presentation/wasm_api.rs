use futures::future::AbortHandle;
use js_sys::Function;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;

use crate::application::{PositionChart, PositionTooltip, run_feed, snapshot_channel};
use crate::config::ChartConfig;
use crate::domain::{
    chart::{CrosshairEvent, CrosshairHandler, Theme},
    errors::ChartError,
    logging::LogComponent,
    market_data::Symbol,
};
use crate::event_utils::{WindowListener, on_window_resize};
use crate::infrastructure::charting::LightweightChartFactory;
use crate::infrastructure::http::{SnapshotPoller, parse_candles, parse_positions, parse_ticker};
use crate::{log_info, log_warn};

type Chart = PositionChart<LightweightChartFactory>;
type HoverCallback = Rc<RefCell<Option<Function>>>;

impl From<ChartError> for JsValue {
    fn from(error: ChartError) -> Self {
        js_sys::Error::new(&error.to_string()).into()
    }
}

/// Must run with no borrow of the chart held: the callback may call back into the API.
fn notify_hover(callback: &HoverCallback, tooltip: Option<PositionTooltip>) {
    let Some(function) = callback.borrow().clone() else {
        return;
    };
    let argument = tooltip.map(|t| JsValue::from_str(&t.text())).unwrap_or(JsValue::NULL);
    if let Err(e) = function.call1(&JsValue::NULL, &argument) {
        log_warn!(LogComponent::Presentation("PositionChartApi"), "hover callback threw: {:?}", e);
    }
}

fn crosshair_handler(chart: Weak<RefCell<Chart>>, callback: HoverCallback) -> CrosshairHandler {
    Rc::new(move |event: CrosshairEvent| {
        let Some(cell) = chart.upgrade() else {
            return;
        };
        let changed = match cell.try_borrow_mut() {
            Ok(mut chart) => chart.handle_crosshair(event).then(|| chart.tooltip()),
            Err(_) => return,
        };
        if let Some(tooltip) = changed {
            notify_hover(&callback, tooltip);
        }
    })
}

/// Position chart for plain JavaScript hosts. Data is passed as JSON text in
/// the same shapes the snapshot endpoints serve.
#[wasm_bindgen]
pub struct PositionChartApi {
    chart: Rc<RefCell<Chart>>,
    hover_callback: HoverCallback,
    config: ChartConfig,
    poller: Option<AbortHandle>,
    resize_listener: Option<WindowListener>,
}

#[wasm_bindgen]
impl PositionChartApi {
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, symbol: &str, config_json: Option<String>) -> Result<PositionChartApi, JsValue> {
        let config = match config_json {
            Some(raw) => ChartConfig::from_json(&raw)?,
            None => ChartConfig::default(),
        };
        let factory = LightweightChartFactory::from_element_id(container_id)?;
        let symbol = Symbol::new(symbol.to_string())?;
        let hover_callback: HoverCallback = Rc::new(RefCell::new(None));

        let chart = Rc::new_cyclic(|weak| {
            let handler = crosshair_handler(weak.clone(), hover_callback.clone());
            RefCell::new(
                PositionChart::new(factory, config.clone(), Theme::default(), symbol).with_crosshair_handler(handler),
            )
        });
        chart.borrow_mut().mount()?;

        let resize_listener = {
            let chart = Rc::downgrade(&chart);
            on_window_resize(move || {
                let Some(cell) = chart.upgrade() else {
                    return;
                };
                if let Ok(mut chart) = cell.try_borrow_mut() {
                    chart.resize();
                }
            })
        };

        log_info!(LogComponent::Presentation("PositionChartApi"), "chart created in '{}'", container_id);
        Ok(Self { chart, hover_callback, config, poller: None, resize_listener: Some(resize_listener) })
    }

    #[wasm_bindgen(js_name = setCandles)]
    pub fn set_candles(&self, json: &str) -> Result<(), JsValue> {
        let candles = parse_candles(json)?;
        self.chart.borrow_mut().update_candles(candles);
        Ok(())
    }

    /// Replaces the open positions. Returns whether the hovered position changed.
    #[wasm_bindgen(js_name = setPositions)]
    pub fn set_positions(&self, json: &str) -> Result<bool, JsValue> {
        let positions = parse_positions(json)?;
        let changed = {
            let mut chart = self.chart.borrow_mut();
            chart.update_positions(positions).then(|| chart.tooltip())
        };
        let hover_changed = changed.is_some();
        if let Some(tooltip) = changed {
            notify_hover(&self.hover_callback, tooltip);
        }
        Ok(hover_changed)
    }

    /// `null` or `undefined` clears the ticker line
    #[wasm_bindgen(js_name = setTicker)]
    pub fn set_ticker(&self, json: Option<String>) -> Result<(), JsValue> {
        let ticker = json.as_deref().map(parse_ticker).transpose()?;
        self.chart.borrow_mut().update_ticker(ticker);
        Ok(())
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, theme: &str) -> Result<(), JsValue> {
        let theme: Theme = theme.parse().map_err(ChartError::from)?;
        let tooltip = {
            let mut chart = self.chart.borrow_mut();
            chart.set_theme(theme)?;
            chart.tooltip()
        };
        notify_hover(&self.hover_callback, tooltip);
        Ok(())
    }

    #[wasm_bindgen(js_name = setSymbol)]
    pub fn set_symbol(&self, symbol: &str) -> Result<(), JsValue> {
        let symbol = Symbol::new(symbol.to_string())?;
        let tooltip = {
            let mut chart = self.chart.borrow_mut();
            chart.set_symbol(symbol);
            chart.tooltip()
        };
        notify_hover(&self.hover_callback, tooltip);
        Ok(())
    }

    pub fn resize(&self) {
        self.chart.borrow_mut().resize();
    }

    /// Called with the tooltip text of the hovered position, or `null`
    #[wasm_bindgen(js_name = onHoverChange)]
    pub fn on_hover_change(&self, callback: Option<Function>) {
        *self.hover_callback.borrow_mut() = callback;
    }

    #[wasm_bindgen(js_name = hoveredPositionId)]
    pub fn hovered_position_id(&self) -> Option<String> {
        self.chart.borrow().hover_state().position().map(|p| p.id.clone())
    }

    #[wasm_bindgen(js_name = priceLineCount)]
    pub fn price_line_count(&self) -> usize {
        self.chart.borrow().price_line_count()
    }

    /// Poll the configured endpoints and apply every response. Returns false
    /// when no endpoint is configured.
    #[wasm_bindgen(js_name = startPolling)]
    pub fn start_polling(&mut self) -> bool {
        let poller = SnapshotPoller::new(self.config.feed.clone());
        if !poller.has_endpoints() {
            log_warn!(LogComponent::Presentation("PositionChartApi"), "no snapshot endpoints configured");
            return false;
        }
        self.stop_polling();

        let (sender, receiver) = snapshot_channel();
        self.poller = Some(poller.spawn(sender));
        let callback = self.hover_callback.clone();
        wasm_bindgen_futures::spawn_local(run_feed(receiver, self.chart.clone(), move |tooltip| {
            notify_hover(&callback, tooltip)
        }));
        true
    }

    #[wasm_bindgen(js_name = stopPolling)]
    pub fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
    }

    /// Remove the chart and every price line. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.stop_polling();
        if let Some(listener) = self.resize_listener.take() {
            listener.remove();
        }
        if let Ok(mut chart) = self.chart.try_borrow_mut() {
            chart.unmount();
        }
        *self.hover_callback.borrow_mut() = None;
    }
}

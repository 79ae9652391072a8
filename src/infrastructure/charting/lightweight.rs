//! Binding to the `LightweightCharts` browser global (lightweight-charts v4).

use gloo::utils::format::JsValueSerdeExt;
use js_sys::{Function, Map, Reflect};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::domain::{
    chart::{
        ChartFactory, ChartOptions, ChartSurface, CoordinateSpace, CrosshairEvent, CrosshairHandler, LogicalRange,
        Point, PriceLineOptions,
    },
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::{Candle, Price, Timestamp},
};
use crate::log_error;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = LightweightCharts, js_name = createChart, catch)]
    fn create_chart(container: &HtmlElement, options: &JsValue) -> Result<IChartApi, JsValue>;

    type IChartApi;

    #[wasm_bindgen(method, js_name = addCandlestickSeries)]
    fn add_candlestick_series(this: &IChartApi, options: &JsValue) -> ISeriesApi;

    #[wasm_bindgen(method, js_name = timeScale)]
    fn time_scale(this: &IChartApi) -> ITimeScaleApi;

    #[wasm_bindgen(method, js_name = applyOptions)]
    fn apply_options(this: &IChartApi, options: &JsValue);

    #[wasm_bindgen(method)]
    fn resize(this: &IChartApi, width: u32, height: u32);

    #[wasm_bindgen(method)]
    fn remove(this: &IChartApi);

    #[wasm_bindgen(method, js_name = subscribeCrosshairMove)]
    fn subscribe_crosshair_move(this: &IChartApi, handler: &Function);

    #[wasm_bindgen(method, js_name = unsubscribeCrosshairMove)]
    fn unsubscribe_crosshair_move(this: &IChartApi, handler: &Function);

    type ISeriesApi;

    #[wasm_bindgen(method, js_name = setData)]
    fn set_data(this: &ISeriesApi, data: &JsValue);

    #[wasm_bindgen(method, js_name = createPriceLine)]
    fn create_price_line(this: &ISeriesApi, options: &JsValue) -> IPriceLine;

    #[wasm_bindgen(method, js_name = removePriceLine, catch)]
    fn remove_price_line(this: &ISeriesApi, line: &IPriceLine) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = priceToCoordinate)]
    fn price_to_coordinate(this: &ISeriesApi, price: f64) -> Option<f64>;

    type ITimeScaleApi;

    #[wasm_bindgen(method, js_name = getVisibleLogicalRange)]
    fn get_visible_logical_range(this: &ITimeScaleApi) -> JsValue;

    #[wasm_bindgen(method, js_name = setVisibleLogicalRange)]
    fn set_visible_logical_range(this: &ITimeScaleApi, range: &JsValue);

    #[wasm_bindgen(method, js_name = timeToCoordinate)]
    fn time_to_coordinate(this: &ITimeScaleApi, time: f64) -> Option<f64>;

    pub type IPriceLine;
}

/// Creates charts inside one DOM container
pub struct LightweightChartFactory {
    container: HtmlElement,
}

impl LightweightChartFactory {
    pub fn new(container: HtmlElement) -> Self {
        Self { container }
    }

    pub fn from_element_id(id: &str) -> ChartResult<Self> {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| ChartError::Backend(format!("container '{}' not found", id)))?;
        let container = element
            .dyn_into::<HtmlElement>()
            .map_err(|_| ChartError::Backend(format!("container '{}' is not an HTML element", id)))?;
        Ok(Self::new(container))
    }

    fn chart_options_json(options: &ChartOptions) -> serde_json::Value {
        let palette = &options.palette;
        json!({
            "width": options.width,
            "height": options.height,
            "layout": {
                "background": { "type": "solid", "color": palette.background.to_css() },
                "textColor": palette.text.to_css(),
            },
            "grid": {
                "vertLines": { "color": palette.grid.to_css() },
                "horzLines": { "color": palette.grid.to_css() },
            },
            "rightPriceScale": { "borderColor": palette.border.to_css() },
            "timeScale": {
                "borderColor": palette.border.to_css(),
                "timeVisible": true,
                "secondsVisible": false,
                "shiftVisibleRangeOnNewBar": options.shift_visible_range_on_new_bar,
            },
            "watermark": Self::watermark_json(options.watermark.as_deref(), palette.text.with_alpha(0.1).to_css()),
        })
    }

    fn watermark_json(text: Option<&str>, color: String) -> serde_json::Value {
        json!({
            "visible": text.is_some(),
            "text": text.unwrap_or_default(),
            "color": color,
            "fontSize": 36,
        })
    }
}

impl ChartFactory for LightweightChartFactory {
    type Surface = LightweightChart;

    fn create_chart(&mut self, options: &ChartOptions) -> ChartResult<LightweightChart> {
        let chart_options = to_js(&Self::chart_options_json(options))?;
        let chart = create_chart(&self.container, &chart_options)
            .map_err(|e| ChartError::Backend(format!("createChart failed: {:?}", e)))?;

        let palette = &options.palette;
        let series_options = to_js(&json!({
            "upColor": palette.up.to_css(),
            "downColor": palette.down.to_css(),
            "borderVisible": false,
            "wickUpColor": palette.up.to_css(),
            "wickDownColor": palette.down.to_css(),
        }))?;
        let series = chart.add_candlestick_series(&series_options);

        Ok(LightweightChart {
            chart,
            series,
            watermark_color: palette.text.with_alpha(0.1).to_css(),
            crosshair: None,
            disposed: false,
        })
    }

    fn container_size(&self) -> (u32, u32) {
        (self.container.client_width().max(0) as u32, self.container.client_height().max(0) as u32)
    }
}

pub struct LightweightChart {
    chart: IChartApi,
    series: ISeriesApi,
    watermark_color: String,
    crosshair: Option<Closure<dyn FnMut(JsValue)>>,
    disposed: bool,
}

impl LightweightChart {
    fn unsubscribe_crosshair(&mut self) {
        if let Some(closure) = self.crosshair.take() {
            self.chart.unsubscribe_crosshair_move(closure.as_ref().unchecked_ref());
        }
    }
}

impl CoordinateSpace for LightweightChart {
    fn time_to_coordinate(&self, time: Timestamp) -> Option<f64> {
        if self.disposed {
            return None;
        }
        self.chart.time_scale().time_to_coordinate(time.as_f64())
    }

    fn price_to_coordinate(&self, price: Price) -> Option<f64> {
        if self.disposed {
            return None;
        }
        self.series.price_to_coordinate(price.value())
    }
}

impl ChartSurface for LightweightChart {
    type PriceLine = IPriceLine;

    fn set_candles(&mut self, candles: &[Candle]) {
        match JsValue::from_serde(&candles) {
            Ok(data) => self.series.set_data(&data),
            Err(e) => {
                log_error!(LogComponent::Infrastructure("LightweightChart"), "candle serialization failed: {}", e);
            }
        }
    }

    fn visible_logical_range(&self) -> Option<LogicalRange> {
        if self.disposed {
            return None;
        }
        let raw = self.chart.time_scale().get_visible_logical_range();
        if !raw.is_object() {
            return None;
        }
        let from = Reflect::get(&raw, &JsValue::from_str("from")).ok()?.as_f64()?;
        let to = Reflect::get(&raw, &JsValue::from_str("to")).ok()?.as_f64()?;
        Some(LogicalRange::new(from, to))
    }

    fn set_visible_logical_range(&mut self, range: LogicalRange) {
        if self.disposed {
            return;
        }
        if let Ok(value) = JsValue::from_serde(&range) {
            self.chart.time_scale().set_visible_logical_range(&value);
        }
    }

    fn create_price_line(&mut self, options: &PriceLineOptions) -> IPriceLine {
        let value = JsValue::from_serde(options).unwrap_or(JsValue::UNDEFINED);
        self.series.create_price_line(&value)
    }

    fn remove_price_line(&mut self, line: &IPriceLine) -> ChartResult<()> {
        if self.disposed {
            return Err(ChartError::StaleHandle("chart already removed".to_string()));
        }
        self.series
            .remove_price_line(line)
            .map_err(|e| ChartError::StaleHandle(format!("{:?}", e)))
    }

    fn subscribe_crosshair_move(&mut self, handler: CrosshairHandler) {
        self.unsubscribe_crosshair();
        let series: JsValue = (*self.series).clone();
        let closure = Closure::wrap(Box::new(move |param: JsValue| {
            handler(crosshair_event_from(&param, &series));
        }) as Box<dyn FnMut(JsValue)>);
        self.chart.subscribe_crosshair_move(closure.as_ref().unchecked_ref());
        self.crosshair = Some(closure);
    }

    fn set_watermark(&mut self, text: &str) {
        if self.disposed {
            return;
        }
        let watermark = LightweightChartFactory::watermark_json(Some(text), self.watermark_color.clone());
        if let Ok(value) = to_js(&json!({ "watermark": watermark })) {
            self.chart.apply_options(&value);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if !self.disposed {
            self.chart.resize(width, height);
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.unsubscribe_crosshair();
        self.chart.remove();
        self.disposed = true;
    }
}

fn to_js(value: &serde_json::Value) -> ChartResult<JsValue> {
    JsValue::from_serde(value).map_err(|e| ChartError::Backend(format!("options serialization failed: {}", e)))
}

/// Reads `{ time, point: { x, y }, seriesData }` from a crosshair callback
fn crosshair_event_from(param: &JsValue, series: &JsValue) -> CrosshairEvent {
    let field = |target: &JsValue, name: &str| Reflect::get(target, &JsValue::from_str(name)).ok();

    let time = field(param, "time").and_then(|t| t.as_f64()).map(|t| Timestamp::from(t as u64));
    let point = field(param, "point").filter(|p| p.is_object()).and_then(|p| {
        let x = field(&p, "x")?.as_f64()?;
        let y = field(&p, "y")?.as_f64()?;
        Some(Point::new(x, y))
    });
    let price = field(param, "seriesData")
        .and_then(|data| data.dyn_into::<Map>().ok())
        .map(|data| data.get(series))
        .filter(|bar| bar.is_object())
        .and_then(|bar| {
            field(&bar, "close")
                .and_then(|v| v.as_f64())
                .or_else(|| field(&bar, "value").and_then(|v| v.as_f64()))
        })
        .map(Price::from);

    CrosshairEvent { time, point, price }
}

use js_sys::Date;
use wasm_bindgen::JsValue;

use crate::domain::market_data::Timestamp;

/// `YYYY-MM-DD HH:MM` in UTC for a timestamp in seconds
pub fn format_entry_time(time: Timestamp) -> String {
    let date = Date::new(&JsValue::from_f64(time.as_millis() as f64));
    format!(
        "{}-{:02}-{:02} {:02}:{:02}",
        date.get_utc_full_year(),
        date.get_utc_month() + 1,
        date.get_utc_date(),
        date.get_utc_hours(),
        date.get_utc_minutes()
    )
}

/// Tooltip row for a position's opening time
pub fn entry_time_line(time: Option<Timestamp>) -> Option<String> {
    time.map(|t| format!("Opened: {} UTC", format_entry_time(t)))
}

use derive_more::Display;
use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::domain::errors::ChartError;
use crate::domain::market_data::Price;

/// Value Object - Visual theme of the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum Theme {
    #[display(fmt = "Light")]
    #[strum(serialize = "light")]
    Light,
    #[default]
    #[display(fmt = "Dark")]
    #[strum(serialize = "dark")]
    Dark,
}

impl Theme {
    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Light => ThemePalette {
                background: Color::from_hex(0xFFFFFF),
                text: Color::from_hex(0x191919),
                grid: Color::from_hex(0xF0F3FA),
                border: Color::from_hex(0xD1D4DC),
                up: Color::from_hex(0x26A69A),
                down: Color::from_hex(0xEF5350),
            },
            Theme::Dark => ThemePalette {
                background: Color::from_hex(0x131722),
                text: Color::from_hex(0xD1D4DC),
                grid: Color::from_hex(0x2B2B43),
                border: Color::from_hex(0x485C7B),
                up: Color::from_hex(0x26A69A),
                down: Color::from_hex(0xEF5350),
            },
        }
    }
}

/// Colors applied to the chart layout and candle series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub background: Color,
    pub text: Color,
    pub grid: Color,
    pub border: Color,
    pub up: Color,
    pub down: Color,
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::new(r, g, b, 1.0)
    }

    /// Parses `#rrggbb` (the leading `#` is optional)
    pub fn parse_hex(value: &str) -> Result<Self, ChartError> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ChartError::Configuration(format!("Invalid color '{}'", value)));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ChartError::Configuration(format!("Invalid color '{}'", value)))
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    /// CSS form understood by the charting library
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:06x}", self.to_hex())
        } else {
            let hex = self.to_hex();
            format!(
                "rgba({}, {}, {}, {})",
                (hex >> 16) & 0xFF,
                (hex >> 8) & 0xFF,
                hex & 0xFF,
                self.a
            )
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Value Object - Visible window in bar-index space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalRange {
    pub from: f64,
    pub to: f64,
}

impl LogicalRange {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    pub fn width(&self) -> f64 {
        self.to - self.from
    }
}

/// Value Object - Pixel position inside the chart pane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stroke style of a price line; serialized with the library's numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

impl LineStyle {
    pub fn code(&self) -> u8 {
        match self {
            LineStyle::Solid => 0,
            LineStyle::Dashed => 2,
        }
    }
}

impl Serialize for LineStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Everything needed to draw one horizontal price annotation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLineOptions {
    pub price: Price,
    pub color: Color,
    pub line_width: u8,
    pub line_style: LineStyle,
    pub axis_label_visible: bool,
    pub title: String,
}

/// Options used when a chart instance is constructed
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub palette: ThemePalette,
    pub watermark: Option<String>,
    /// Must stay `false`: new bars never scroll the viewport on their own
    pub shift_visible_range_on_new_bar: bool,
}

impl ChartOptions {
    pub fn new(width: u32, height: u32, theme: Theme) -> Self {
        Self {
            width,
            height,
            palette: theme.palette(),
            watermark: None,
            shift_visible_range_on_new_bar: false,
        }
    }

    pub fn with_watermark(mut self, text: impl Into<String>) -> Self {
        self.watermark = Some(text.into());
        self
    }
}

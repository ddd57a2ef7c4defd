//! Colours, per-cell styles and the fixed dimensions of the report template.
//!
//! All lengths are PDF points (1/72 inch), origin at the top-left of the page.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Template constants
// ---------------------------------------------------------------------------

/// A4 portrait.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// 10 mm.
pub const DEFAULT_MARGIN_PT: f32 = 28.35;

pub const TITLE_FONT_SIZE: f32 = 13.0;
pub const SECTION_FONT_SIZE: f32 = 12.0;
pub const BODY_FONT_SIZE: f32 = 10.0;
pub const TABLE_FONT_SIZE: f32 = 9.0;
pub const CAPTION_FONT_SIZE: f32 = 8.0;

/// Height of one label:value line and of one table row.
pub const LINE_HEIGHT: f32 = 16.0;
pub const ROW_HEIGHT: f32 = 16.0;
pub const PARAGRAPH_LINE_HEIGHT: f32 = 13.0;

// Running header.
pub const LETTERHEAD_WIDTH: f32 = 170.0;
pub const LETTERHEAD_HEIGHT: f32 = 56.0;
pub const ID_ROW_HEIGHT: f32 = 18.0;
/// Left logo: x offset, y offset, width, height inside the letterhead cell.
pub const LOGO_LEFT_BOX: [f32; 4] = [6.0, 8.0, 70.0, 40.0];
pub const LOGO_RIGHT_BOX: [f32; 4] = [88.0, 8.0, 76.0, 40.0];

/// Plate, count.
pub const RANKING_COLUMNS: [f32; 2] = [160.0, 100.0];
/// Timestamp, plate, radar, lane, speed, occurrence.
pub const DETECTION_COLUMNS: [f32; 6] = [116.0, 80.0, 90.0, 50.0, 80.0, 104.0];

/// Total width of a fixed-column table.
pub fn table_width(columns: &[f32]) -> f32 {
    columns.iter().sum()
}

// ---------------------------------------------------------------------------
// Colours
// ---------------------------------------------------------------------------

/// RGB colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB` or `#RGB`, the leading `#` optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => Some(Self::new(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            )),
            _ => None,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::YELLOW
    }
}

/// Options files may give a colour as `"#ffff00"` or `{"r":1,"g":1,"b":0}`.
impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Channels { r: f32, g: f32, b: f32 },
        }
        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Rgb::from_hex(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid hex colour {s:?}"))),
            Repr::Channels { r, g, b } => Ok(Rgb::new(r, g, b)),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell styles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Everything needed to draw one cell. Passed by value on every draw call so
/// that nothing carries over from the previous cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub font_size: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub border: bool,
    pub fill: Option<Rgb>,
}

impl CellStyle {
    /// Regular body text, left aligned, no border.
    pub const fn text(font_size: f32) -> Self {
        Self {
            font_size,
            bold: false,
            align: TextAlign::Left,
            border: false,
            fill: None,
        }
    }

    /// Bordered, centred table cell with no fill.
    pub const fn table(font_size: f32) -> Self {
        Self {
            font_size,
            bold: false,
            align: TextAlign::Center,
            border: true,
            fill: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self
    }

    pub fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    pub fn filled(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }
}

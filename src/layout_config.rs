//! Layout config – the frozen representation between the layout engine and
//! PDF rendering. It encodes exactly what goes on each page, so it can be
//! dumped as JSON, inspected in tests, and rendered later.

use serde::{Deserialize, Serialize};

use crate::style::TextAlign;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
}

/// A positioned rectangle with optional content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    /// Background fill (RGB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub width: f32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    pub color: [f32; 3],
    pub align: TextAlign,
    /// Baseline start relative to the box's top-left corner.
    pub x_offset: f32,
    pub baseline_offset: f32,
}

/// Reference to a logo registered with the renderer under `asset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub asset: String,
}

impl LayoutConfig {
    fn default_title() -> String {
        "Joint license-plate detection report".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    /// Every text string on `page`, in drawing order.
    pub fn page_texts(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|p| {
                p.boxes
                    .iter()
                    .filter_map(|b| b.text.as_ref().map(|t| t.text.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every text string in the document, in drawing order.
    pub fn all_texts(&self) -> Vec<&str> {
        (0..self.pages.len()).flat_map(|i| self.page_texts(i)).collect()
    }

    /// Asset keys referenced anywhere in the layout, first use first.
    pub fn asset_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for page in &self.pages {
            for lbox in &page.boxes {
                if let Some(img) = &lbox.image {
                    if !keys.contains(&img.asset.as_str()) {
                        keys.push(img.asset.as_str());
                    }
                }
            }
        }
        keys
    }
}

impl LayoutBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: None,
            border: None,
            text: None,
            image: None,
        }
    }

    /// Bottom edge in page coordinates.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn text_str(&self) -> Option<&str> {
        self.text.as_ref().map(|t| t.text.as_str())
    }
}

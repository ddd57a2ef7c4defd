//! Pipeline – ties together loading, layout and rendering into a single
//! function call.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::{LogoPaths, ReportAssets};
use crate::canvas::PageGeometry;
use crate::error::ReportError;
use crate::labels::Language;
use crate::layout::layout_report;
use crate::layout_config::LayoutConfig;
use crate::model::{is_report_id_char, Report};
use crate::render::render_pdf_at;
use crate::style::{Rgb, A4_HEIGHT_PT, A4_WIDTH_PT, DEFAULT_MARGIN_PT};

/// Horizontal and vertical page margins, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMargins {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_MARGIN_PT,
            vertical: DEFAULT_MARGIN_PT,
        }
    }
}

/// Configuration for report generation. Every field has a default, so an
/// options file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Print the explanatory sections before the data (default: false).
    pub include_boilerplate: bool,
    /// Fill of rows that contain the monitored plate (default: yellow).
    pub highlight_color: Rgb,
    pub margins: PageMargins,
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Wording of titles, labels and messages: `"en"` (default) or `"pt"`.
    pub language: Language,
    pub logos: LogoPaths,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_boilerplate: false,
            highlight_color: Rgb::YELLOW,
            margins: PageMargins::default(),
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            title: "Joint license-plate detection report".to_string(),
            language: Language::default(),
            logos: LogoPaths::default(),
        }
    }
}

impl ReportOptions {
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            width: self.page_width,
            height: self.page_height,
            margin_x: self.margins.horizontal,
            margin_y: self.margins.vertical,
        }
    }

    /// Read options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ReportError> {
        let text = fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read options '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ReportError::Config(format!("invalid options '{}': {e}", path.display()))
        })
    }
}

/// A finished report: the PDF bytes plus what produced them.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub report_id: String,
    pub pdf: Vec<u8>,
    pub layout: LayoutConfig,
}

impl GeneratedReport {
    pub fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    /// `report_<id>.pdf`. Characters other than ASCII letters, digits, `.`,
    /// `_` and `-` are replaced with `_`.
    pub fn file_name(&self) -> String {
        let id: String = self
            .report_id
            .chars()
            .map(|c| if is_report_id_char(c) { c } else { '_' })
            .collect();
        format!("report_{id}.pdf")
    }

    /// Header value for serving the PDF as a download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.file_name())
    }

    pub fn page_count(&self) -> usize {
        self.layout.pages.len()
    }
}

/// Layout only (no PDF rendering) – useful for testing and inspection.
pub fn compute_report_layout(report: &Report, options: &ReportOptions) -> LayoutConfig {
    layout_report(report, options)
}

/// Full pipeline: validated report → PDF bytes. The PDF metadata dates are
/// the report's generation time, so equal reports give equal documents.
pub fn generate_report(
    report: &Report,
    options: &ReportOptions,
    assets: &ReportAssets,
) -> Result<GeneratedReport, ReportError> {
    let layout = layout_report(report, options);
    let pdf = render_pdf_at(&layout, assets, report.generated_at())?;
    Ok(GeneratedReport {
        report_id: report.report_id().to_string(),
        pdf,
        layout,
    })
}

/// Full pipeline from the three JSON documents as text.
///
/// Validation happens before any layout work; a validation failure never
/// produces a partial PDF.
pub fn generate_report_from_json(
    params: &str,
    data: &str,
    ranking: &str,
    options: &ReportOptions,
    assets: &ReportAssets,
) -> Result<GeneratedReport, ReportError> {
    let report = Report::from_json_strs(params, data, ranking)?;
    generate_report(&report, options, assets)
}

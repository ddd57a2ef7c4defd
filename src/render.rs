//! PDF renderer – replays a frozen [`LayoutConfig`] as printpdf (v0.8) ops.
//!
//! Layout coordinates grow downwards from the top-left corner; PDF user space
//! grows upwards from the bottom-left. [`PageWriter`] owns that flip so the
//! per-box drawing code can stay in layout terms.
//!
//! Output is a function of the layout, the logos and the creation time only:
//! logo XObjects are keyed by asset name, so two renders of the same input
//! differ in the trailer `/ID` alone.

use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use printpdf::*;

use crate::assets::ReportAssets;
use crate::error::ReportError;
use crate::layout_config::{LayoutBox, LayoutConfig, TextContent};

const MM_PER_PT: f32 = 25.4 / 72.0;

/// An embedded logo: its XObject and the source pixel size.
struct EmbeddedLogo {
    id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Render a LayoutConfig into PDF bytes, dated now.
///
/// Every image the layout references must be present in `assets`.
pub fn render_pdf(config: &LayoutConfig, assets: &ReportAssets) -> Result<Vec<u8>, ReportError> {
    render_pdf_at(config, assets, Local::now().naive_local())
}

/// Like [`render_pdf`] with `created` as the document's creation,
/// modification and metadata date.
pub fn render_pdf_at(
    config: &LayoutConfig,
    assets: &ReportAssets,
    created: NaiveDateTime,
) -> Result<Vec<u8>, ReportError> {
    let mut doc = PdfDocument::new(&config.title);
    let stamp = pdf_date(created);
    let info = &mut doc.metadata.info;
    info.creation_date = stamp;
    info.modification_date = stamp;
    info.metadata_date = stamp;
    let logos = embed_logos(&mut doc, config, assets)?;

    let (width, height) = (
        Mm(config.page_width_pt * MM_PER_PT),
        Mm(config.page_height_pt * MM_PER_PT),
    );
    let mut pages: Vec<PdfPage> = config
        .pages
        .iter()
        .map(|page| {
            let mut writer = PageWriter::new(config.page_height_pt, &logos);
            page.boxes.iter().for_each(|lbox| writer.draw(lbox));
            PdfPage::new(width, height, writer.ops)
        })
        .collect();
    if pages.is_empty() {
        pages.push(PdfPage::new(width, height, Vec::new()));
    }

    doc.with_pages(pages);
    // Text is written as raw `Tj` operators, which are dropped in secure mode.
    let save_options = PdfSaveOptions {
        secure: false,
        ..PdfSaveOptions::default()
    };
    let bytes = doc.save(&save_options, &mut Vec::new());
    log::debug!("rendered {} page(s), {} bytes", config.pages.len(), bytes.len());
    Ok(bytes)
}

/// Register each referenced logo once under its asset key; pages then point
/// at it by id.
fn embed_logos<'a>(
    doc: &mut PdfDocument,
    config: &'a LayoutConfig,
    assets: &ReportAssets,
) -> Result<HashMap<&'a str, EmbeddedLogo>, ReportError> {
    let mut logos = HashMap::new();
    for key in config.asset_keys() {
        let logo = assets
            .get(key)
            .ok_or_else(|| ReportError::Config(format!("no logo registered for `{key}`")))?;
        let raw = RawImage::decode_from_bytes(&logo.bytes, &mut Vec::new())
            .map_err(|e| ReportError::Render(format!("cannot embed logo `{key}`: {e}")))?;
        let id = XObjectId(key.to_string());
        doc.resources
            .xobjects
            .map
            .insert(id.clone(), XObject::Image(raw));
        logos.insert(
            key,
            EmbeddedLogo {
                id,
                px_width: logo.px_width,
                px_height: logo.px_height,
            },
        );
    }
    Ok(logos)
}

/// Collects the ops of one page. Boxes are drawn fill, border, text, image.
struct PageWriter<'a> {
    ops: Vec<Op>,
    page_height: f32,
    logos: &'a HashMap<&'a str, EmbeddedLogo>,
}

impl<'a> PageWriter<'a> {
    fn new(page_height: f32, logos: &'a HashMap<&'a str, EmbeddedLogo>) -> Self {
        Self {
            ops: Vec::new(),
            page_height,
            logos,
        }
    }

    fn draw(&mut self, lbox: &LayoutBox) {
        if let Some(fill) = lbox.fill {
            self.fill_rect(lbox, fill);
        }
        if let Some(border) = &lbox.border {
            self.stroke_rect(lbox, border.width, border.color);
        }
        if let Some(text) = &lbox.text {
            self.text(lbox, text);
        }
        if let Some(image) = &lbox.image {
            self.image(lbox, &image.asset);
        }
    }

    /// Corners in PDF space, counter-clockwise from bottom-left.
    fn corners(&self, lbox: &LayoutBox) -> [Point; 4] {
        let top = self.page_height - lbox.y;
        let bottom = top - lbox.height;
        let right = lbox.x + lbox.width;
        [
            pt(lbox.x, bottom),
            pt(right, bottom),
            pt(right, top),
            pt(lbox.x, top),
        ]
    }

    fn fill_rect(&mut self, lbox: &LayoutBox, color: [f32; 3]) {
        let points = self
            .corners(lbox)
            .into_iter()
            .map(|p| LinePoint { p, bezier: false })
            .collect();
        self.ops.push(Op::SetFillColor { col: rgb(color) });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn stroke_rect(&mut self, lbox: &LayoutBox, width: f32, color: [f32; 3]) {
        let points = self
            .corners(lbox)
            .into_iter()
            .map(|p| LinePoint { p, bezier: false })
            .collect();
        self.ops.push(Op::SetOutlineColor { col: rgb(color) });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(width) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points,
                is_closed: true,
            },
        });
    }

    fn text(&mut self, lbox: &LayoutBox, text: &TextContent) {
        let font = if text.bold {
            BuiltinFont::HelveticaBold
        } else {
            BuiltinFont::Helvetica
        };
        let baseline = self.page_height - lbox.y - text.baseline_offset;
        self.ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: pt(lbox.x + text.x_offset, baseline),
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(text.font_size),
                font,
            },
            Op::SetFillColor {
                col: rgb(text.color),
            },
            // No items: only registers the font resource for this page.
            Op::WriteTextBuiltinFont {
                items: Vec::new(),
                font,
            },
            Op::Unknown {
                key: "Tj".to_string(),
                value: vec![DictItem::String {
                    data: to_winansi(&text.text),
                    literal: false,
                }],
            },
            Op::EndTextSection,
        ]);
    }

    fn image(&mut self, lbox: &LayoutBox, asset: &str) {
        let Some(logo) = self.logos.get(asset) else {
            return;
        };
        // At 72 dpi one source pixel is one point.
        let scale = |target: f32, px: u32| if px > 0 { target / px as f32 } else { 1.0 };
        self.ops.push(Op::UseXobject {
            id: logo.id.clone(),
            transform: XObjectTransform {
                translate_x: Some(Pt(lbox.x)),
                translate_y: Some(Pt(self.page_height - lbox.bottom())),
                rotate: None,
                scale_x: Some(scale(lbox.width, logo.px_width)),
                scale_y: Some(scale(lbox.height, logo.px_height)),
                dpi: Some(72.0),
            },
        });
    }
}

/// Windows-1252 code points above 0x7F that have no Latin-1 twin.
const WINANSI_EXTRAS: [(char, u8); 8] = [
    ('\u{20AC}', 0x80),
    ('\u{2026}', 0x85),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
];

/// Re-encode text for the builtin Helvetica faces, which use
/// WinAnsiEncoding: one byte per glyph. Characters outside the encoding
/// become `?`.
fn to_winansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| {
            if let Some(&(_, b)) = WINANSI_EXTRAS.iter().find(|(ch, _)| *ch == c) {
                b
            } else if c == '\u{00A0}' {
                b' '
            } else if (c as u32) < 0x100 {
                c as u8
            } else {
                b'?'
            }
        })
        .collect()
}

fn pdf_date(t: NaiveDateTime) -> DateTime {
    DateTime {
        date: Date {
            year: t.year(),
            month: t.month() as u8,
            day: t.day() as u8,
        },
        time: Time {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
            second: t.second().min(59) as u8,
            millisecond: (t.nanosecond() / 1_000_000).min(999) as u16,
        },
        offset: Offset {
            hours: 0,
            minutes: 0,
            seconds: 0,
            milliseconds: 0,
        },
    }
}

fn rgb([r, g, b]: [f32; 3]) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

fn pt(x: f32, y: f32) -> Point {
    Point { x: Pt(x), y: Pt(y) }
}

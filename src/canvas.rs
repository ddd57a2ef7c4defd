//! Canvas – a cursor-based drawing surface that collects positioned boxes
//! into pages.
//!
//! Handles:
//! - cell placement with borders, fills and aligned text, set smaller
//!   rather than cut when it is wider than its cell
//! - table rows as tall as their tallest cell, wrapping text that would
//!   otherwise shrink below [`MIN_FONT_SIZE`]
//! - automatic page breaks when a cell would cross the bottom margin
//! - a running header, registered once and replayed on every new page
//! - row-granular break checks via [`Canvas::ensure_space`]
//!
//! Coordinates are PDF points measured from the top-left corner of the page.

use crate::fonts::{wrap_text, FontManager};
use crate::layout_config::{BorderStyle, ImageContent, LayoutBox, LayoutConfig, PageLayout, TextContent};
use crate::style::{CellStyle, Rgb, TextAlign};

/// Horizontal padding between a cell edge and its text.
pub const CELL_PADDING: f32 = 2.83;
/// Smallest size a row cell's text is set at before it wraps instead.
pub const MIN_FONT_SIZE: f32 = 6.0;
const BORDER_WIDTH: f32 = 0.5;
const EPSILON: f32 = 0.01;

/// Page size and margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }

    /// Lowest y content may reach before a page break.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_y
    }
}

/// Where the cursor goes after a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// To the right edge of the cell, same line.
    Right,
    /// To the left margin of the next line.
    NextLine,
    /// Directly below the cell, keeping x.
    Below,
}

type HeaderFn = Box<dyn Fn(&mut Canvas)>;

struct FittedText {
    font_size: f32,
    lines: Vec<String>,
}

pub struct Canvas {
    geometry: PageGeometry,
    fonts: FontManager,
    pages: Vec<PageLayout>,
    x: f32,
    y: f32,
    /// y where body content starts on the current page (below the header).
    body_top: f32,
    header: Option<HeaderFn>,
    in_header: bool,
}

impl Canvas {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            fonts: FontManager::new(),
            pages: Vec::new(),
            x: geometry.margin_x,
            y: geometry.margin_y,
            body_top: geometry.margin_y,
            header: None,
            in_header: false,
        }
    }

    /// Register the running header. It is drawn at the top of every page
    /// created afterwards, whether by [`Canvas::add_page`] or by an
    /// automatic break.
    pub fn set_header<F>(&mut self, header: F)
    where
        F: Fn(&mut Canvas) + 'static,
    {
        self.header = Some(Box::new(header));
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn fonts(&self) -> &FontManager {
        &self.fonts
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Start a new page and draw the header on it.
    pub fn add_page(&mut self) {
        let index = self.pages.len();
        self.pages.push(PageLayout {
            page_index: index,
            boxes: Vec::new(),
        });
        self.x = self.geometry.margin_x;
        self.y = self.geometry.margin_y;

        // Taken out for the call so the header can draw on `self`; a header
        // never triggers a nested break.
        if let Some(header) = self.header.take() {
            self.in_header = true;
            header(self);
            self.in_header = false;
            self.header = Some(header);
        }
        self.x = self.geometry.margin_x;
        self.body_top = self.y;
        log::debug!("page {} started, body at y={:.1}", index + 1, self.body_top);
    }

    /// Break the page unless `height` more points fit above the bottom margin.
    /// Returns true when a new page was started.
    ///
    /// A page that holds nothing but its header is never abandoned.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.in_header || self.pages.is_empty() {
            return false;
        }
        if self.y + height > self.geometry.bottom_limit() + EPSILON
            && self.y > self.body_top + EPSILON
        {
            log::debug!(
                "page break before {:.1}pt block at y={:.1} on page {}",
                height,
                self.y,
                self.pages.len()
            );
            self.add_page();
            return true;
        }
        false
    }

    /// Move to the left margin, `height` points further down.
    pub fn ln(&mut self, height: f32) {
        self.x = self.geometry.margin_x;
        self.y += height;
    }

    /// Draw one cell at the cursor. A `width` of zero extends the cell to
    /// the right margin. Text wider than the cell is set at a smaller size.
    pub fn cell(&mut self, width: f32, height: f32, text: &str, style: &CellStyle, flow: Flow) {
        if self.pages.is_empty() {
            self.add_page();
        }
        if !self.in_header && self.y + height > self.geometry.bottom_limit() + EPSILON {
            self.ensure_space(height);
        }

        let width = if width <= 0.0 {
            self.geometry.width - self.geometry.margin_x - self.x
        } else {
            width
        };

        let mut lbox = self.frame(width, height, style);
        if !text.is_empty() {
            let font_size = self.shrunk_size(text, width, style);
            lbox.text = Some(self.text_line(text, width, height, font_size, style));
        }
        self.push(lbox);

        match flow {
            Flow::Right => self.x += width,
            Flow::NextLine => {
                self.x = self.geometry.margin_x;
                self.y += height;
            }
            Flow::Below => self.y += height,
        }
    }

    /// Height [`Canvas::row`] needs for these `(width, text)` cells.
    pub fn row_height(&self, cells: &[(f32, &str)], line_height: f32, style: &CellStyle) -> f32 {
        let lines = cells
            .iter()
            .map(|(width, text)| self.fit_text(text, *width, style).lines.len())
            .max()
            .unwrap_or(1);
        lines.max(1) as f32 * line_height
    }

    /// Draw `(width, text)` cells side by side from the cursor, every cell as
    /// tall as the tallest. A row that would cross the bottom margin moves to
    /// a new page whole. The cursor ends at the left margin below the row.
    pub fn row(&mut self, cells: &[(f32, &str)], line_height: f32, style: &CellStyle) {
        if self.pages.is_empty() {
            self.add_page();
        }
        let height = self.row_height(cells, line_height, style);
        if !self.in_header && self.y + height > self.geometry.bottom_limit() + EPSILON {
            self.ensure_space(height);
        }

        for (width, text) in cells {
            let fitted = self.fit_text(text, *width, style);
            let mut lbox = self.frame(*width, height, style);
            match fitted.lines.as_slice() {
                [line] if line.is_empty() => self.push(lbox),
                [line] => {
                    lbox.text = Some(self.text_line(line, *width, height, fitted.font_size, style));
                    self.push(lbox);
                }
                lines => {
                    self.push(lbox);
                    for (i, line) in lines.iter().enumerate() {
                        let mut line_box = LayoutBox::new(
                            self.x,
                            self.y + i as f32 * line_height,
                            *width,
                            line_height,
                        );
                        line_box.text =
                            Some(self.text_line(line, *width, line_height, fitted.font_size, style));
                        self.push(line_box);
                    }
                }
            }
            self.x += width;
        }
        self.x = self.geometry.margin_x;
        self.y += height;
    }

    /// Word-wrapped text block of `width` (zero = to the right margin), one
    /// `line_height` line per wrapped line. Every line starts at the x the
    /// block started at, including lines moved to a new page. The cursor
    /// ends at the left margin below the block.
    pub fn multi_cell(&mut self, width: f32, line_height: f32, text: &str, style: &CellStyle) {
        let start_x = self.x;
        let width = if width <= 0.0 {
            self.geometry.width - self.geometry.margin_x - start_x
        } else {
            width
        };
        let lines = wrap_text(
            text,
            style.font_size,
            style.bold,
            width - 2.0 * CELL_PADDING,
            &self.fonts,
        );
        for line in &lines {
            self.ensure_space(line_height);
            self.x = start_x;
            self.cell(width, line_height, line, style, Flow::Below);
        }
        self.x = self.geometry.margin_x;
    }

    /// Place an image reference at an absolute position on the current page.
    pub fn image(&mut self, asset: &str, x: f32, y: f32, width: f32, height: f32) {
        if self.pages.is_empty() {
            self.add_page();
        }
        let mut lbox = LayoutBox::new(x, y, width, height);
        lbox.image = Some(ImageContent {
            asset: asset.to_string(),
        });
        self.push(lbox);
    }

    /// Freeze the collected pages.
    pub fn finish(mut self, title: &str) -> LayoutConfig {
        if self.pages.is_empty() {
            self.add_page();
        }
        LayoutConfig {
            title: title.to_string(),
            page_width_pt: self.geometry.width,
            page_height_pt: self.geometry.height,
            pages: self.pages,
        }
    }

    /// Empty box at the cursor carrying the style's fill and border.
    fn frame(&self, width: f32, height: f32, style: &CellStyle) -> LayoutBox {
        let mut lbox = LayoutBox::new(self.x, self.y, width, height);
        lbox.fill = style.fill.map(Rgb::to_array);
        if style.border {
            lbox.border = Some(BorderStyle {
                width: BORDER_WIDTH,
                color: Rgb::BLACK.to_array(),
            });
        }
        lbox
    }

    /// Font size at which `text` fits inside `width`, never above the style's.
    fn shrunk_size(&self, text: &str, width: f32, style: &CellStyle) -> f32 {
        let available = (width - 2.0 * CELL_PADDING).max(0.0);
        let natural = self.fonts.measure_text_width(text, style.font_size, style.bold);
        if natural <= available {
            style.font_size
        } else {
            style.font_size * available / natural
        }
    }

    /// One line at a reduced size when that stays readable, otherwise
    /// wrapped lines at the style's size.
    fn fit_text(&self, text: &str, width: f32, style: &CellStyle) -> FittedText {
        let font_size = self.shrunk_size(text, width, style);
        if font_size >= MIN_FONT_SIZE.min(style.font_size) {
            return FittedText {
                font_size,
                lines: vec![text.to_string()],
            };
        }
        FittedText {
            font_size: style.font_size,
            lines: wrap_text(
                text,
                style.font_size,
                style.bold,
                (width - 2.0 * CELL_PADDING).max(0.0),
                &self.fonts,
            ),
        }
    }

    fn text_line(
        &self,
        text: &str,
        width: f32,
        height: f32,
        font_size: f32,
        style: &CellStyle,
    ) -> TextContent {
        let text_width = self.fonts.measure_text_width(text, font_size, style.bold);
        let x_offset = match style.align {
            TextAlign::Left => CELL_PADDING,
            TextAlign::Center => (width - text_width) / 2.0,
            TextAlign::Right => width - CELL_PADDING - text_width,
        };
        TextContent {
            text: text.to_string(),
            font_size,
            bold: style.bold,
            color: Rgb::BLACK.to_array(),
            align: style.align,
            x_offset,
            baseline_offset: 0.5 * height + 0.3 * font_size,
        }
    }

    fn push(&mut self, lbox: LayoutBox) {
        if let Some(page) = self.pages.last_mut() {
            page.boxes.push(lbox);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{A4_HEIGHT_PT, A4_WIDTH_PT, DEFAULT_MARGIN_PT};

    fn a4() -> PageGeometry {
        PageGeometry {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margin_x: DEFAULT_MARGIN_PT,
            margin_y: DEFAULT_MARGIN_PT,
        }
    }

    #[test]
    fn cells_flow_right_then_down() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        let style = CellStyle::table(9.0);
        canvas.cell(100.0, 16.0, "a", &style, Flow::Right);
        assert!((canvas.x() - (DEFAULT_MARGIN_PT + 100.0)).abs() < EPSILON);
        canvas.cell(50.0, 16.0, "b", &style, Flow::NextLine);
        assert!((canvas.x() - DEFAULT_MARGIN_PT).abs() < EPSILON);
        assert!((canvas.y() - (DEFAULT_MARGIN_PT + 16.0)).abs() < EPSILON);
    }

    #[test]
    fn centered_text_offset() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        canvas.cell(100.0, 16.0, "Hello", &CellStyle::table(10.0), Flow::Right);
        let layout = canvas.finish("t");
        let text = layout.pages[0].boxes[0].text.as_ref().unwrap();
        // "Hello" is 22.78pt wide at 10pt.
        assert!((text.x_offset - (100.0 - 22.78) / 2.0).abs() < 0.01);
    }

    #[test]
    fn header_replays_on_every_page() {
        let mut canvas = Canvas::new(a4());
        canvas.set_header(|c| {
            c.cell(0.0, 20.0, "HEADER", &CellStyle::text(10.0), Flow::NextLine);
        });
        canvas.add_page();
        for i in 0..120 {
            canvas.cell(0.0, 16.0, &format!("line {i}"), &CellStyle::text(10.0), Flow::NextLine);
        }
        let pages = canvas.page_count();
        let layout = canvas.finish("t");
        assert!(pages > 1);
        for page in 0..pages {
            assert_eq!(layout.page_texts(page)[0], "HEADER");
        }
    }

    #[test]
    fn automatic_break_resets_x_to_margin() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        canvas.set_y(A4_HEIGHT_PT - DEFAULT_MARGIN_PT - 5.0);
        canvas.set_x(200.0);
        canvas.cell(50.0, 16.0, "x", &CellStyle::table(9.0), Flow::Right);
        assert_eq!(canvas.page_count(), 2);
        let layout = canvas.finish("t");
        let lbox = &layout.pages[1].boxes[0];
        assert!((lbox.x - DEFAULT_MARGIN_PT).abs() < EPSILON);
    }

    #[test]
    fn ensure_space_keeps_fresh_page() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        assert!(!canvas.ensure_space(A4_HEIGHT_PT * 2.0));
        assert_eq!(canvas.page_count(), 1);
        canvas.ln(700.0);
        assert!(canvas.ensure_space(200.0));
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn multi_cell_keeps_indent() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        canvas.set_x(60.0);
        let text = "word ".repeat(80);
        canvas.multi_cell(200.0, 12.0, &text, &CellStyle::text(10.0));
        let layout = canvas.finish("t");
        let boxes = &layout.pages[0].boxes;
        assert!(boxes.len() > 1);
        assert!(boxes.iter().all(|b| (b.x - 60.0).abs() < EPSILON));
    }

    #[test]
    fn wide_cell_text_is_shrunk_not_cut() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        let stamp = "2024-06-01T10:00:00.500+02:00";
        canvas.cell(116.0, 16.0, stamp, &CellStyle::table(9.0), Flow::Right);
        let layout = canvas.finish("t");
        let text = layout.pages[0].boxes[0].text.as_ref().unwrap();
        assert_eq!(text.text, stamp);
        assert!(text.font_size < 9.0);
        let width = FontManager::new().measure_text_width(stamp, text.font_size, false);
        assert!(width <= 116.0 - 2.0 * CELL_PADDING + EPSILON);
    }

    #[test]
    fn row_grows_to_wrapped_cell() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        let address = "Avenida Governador Valadares, 1200, sentido centro, faixa da direita";
        let cells = [(80.0, "ABC1D23"), (60.0, address)];
        let style = CellStyle::table(9.0);
        let height = canvas.row_height(&cells, 16.0, &style);
        assert!(height > 16.0);
        canvas.row(&cells, 16.0, &style);
        assert!((canvas.y() - (DEFAULT_MARGIN_PT + height)).abs() < EPSILON);

        let layout = canvas.finish("t");
        let boxes = &layout.pages[0].boxes;
        assert!(boxes
            .iter()
            .filter(|b| b.border.is_some())
            .all(|b| (b.height - height).abs() < EPSILON));
        let words: Vec<&str> = boxes
            .iter()
            .filter(|b| b.border.is_none())
            .filter_map(|b| b.text_str())
            .flat_map(str::split_whitespace)
            .collect();
        assert_eq!(words.join(" "), address);
    }

    #[test]
    fn row_moves_to_next_page_whole() {
        let mut canvas = Canvas::new(a4());
        canvas.add_page();
        canvas.ln(A4_HEIGHT_PT - 2.0 * DEFAULT_MARGIN_PT - 20.0);
        let cells = [(40.0, "one two three four five six seven")];
        canvas.row(&cells, 16.0, &CellStyle::table(9.0));
        assert_eq!(canvas.page_count(), 2);
        let layout = canvas.finish("t");
        assert!(layout.pages[0].boxes.is_empty());
        assert!(layout.pages[1].boxes.len() > 1);
    }
}

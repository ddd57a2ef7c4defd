//! Layout engine – turns a [`Report`] into canvas draw calls following the
//! fixed report template:
//!
//! 1. running page header (letterhead logos, title, report id) on every page
//! 2. optional explanatory boilerplate
//! 3. summary of the search parameters and totals
//! 4. co-occurrence ranking table
//! 5. one section per detection group, each with its detections table
//!
//! The engine reads the report and options only; all positioning state lives
//! in the [`Canvas`] cursor.

use crate::boilerplate::Block;
use crate::canvas::{Canvas, Flow, CELL_PADDING};
use crate::labels::Labels;
use crate::layout_config::LayoutConfig;
use crate::model::{Detection, DetectionGroup, Report};
use crate::pipeline::ReportOptions;
use crate::style::*;

/// Asset keys the header refers to; the renderer resolves them to logos.
pub const ASSET_LOGO_LEFT: &str = "logo_left";
pub const ASSET_LOGO_RIGHT: &str = "logo_right";

const SECTION_TITLE_HEIGHT: f32 = 22.0;
const SECTION_GAP: f32 = 10.0;
const HEADER_GAP: f32 = 8.0;
const BULLET_INDENT: f32 = 12.0;
const BULLET_WIDTH: f32 = 10.0;

/// Lay out the whole report.
pub fn layout_report(report: &Report, options: &ReportOptions) -> LayoutConfig {
    let labels = options.language.labels();
    let mut canvas = Canvas::new(options.geometry());
    canvas.set_header(page_header(report.report_id().to_string(), labels.report_title));
    canvas.add_page();

    let engine = ReportLayout {
        report,
        options,
        labels,
    };
    if options.include_boilerplate {
        engine.boilerplate(&mut canvas);
    }
    engine.summary(&mut canvas);
    engine.ranking(&mut canvas);
    engine.groups(&mut canvas);

    log::debug!(
        "report {} laid out on {} page(s)",
        report.report_id(),
        canvas.page_count()
    );
    canvas.finish(&options.title)
}

/// The running header, drawn by the canvas at the top of each page.
pub fn page_header(report_id: String, title: &'static str) -> impl Fn(&mut Canvas) + 'static {
    let id_line = format!("ID: {report_id}");
    move |canvas: &mut Canvas| {
        let left = canvas.geometry().margin_x;
        let top = canvas.y();

        canvas.cell(
            LETTERHEAD_WIDTH,
            LETTERHEAD_HEIGHT,
            "",
            &CellStyle::text(BODY_FONT_SIZE).bordered(),
            Flow::Right,
        );
        for (asset, [dx, dy, w, h]) in [(ASSET_LOGO_LEFT, LOGO_LEFT_BOX), (ASSET_LOGO_RIGHT, LOGO_RIGHT_BOX)] {
            canvas.image(asset, left + dx, top + dy, w, h);
        }
        canvas.cell(
            0.0,
            LETTERHEAD_HEIGHT,
            title,
            &CellStyle::text(TITLE_FONT_SIZE).bold().centered().bordered(),
            Flow::NextLine,
        );
        canvas.cell(
            0.0,
            ID_ROW_HEIGHT,
            &id_line,
            &CellStyle::text(BODY_FONT_SIZE).bordered(),
            Flow::NextLine,
        );
        canvas.ln(HEADER_GAP);
    }
}

/// Style of one table body row. Built fresh for every row.
pub fn row_style(highlighted: bool, highlight: Rgb) -> CellStyle {
    let base = CellStyle::table(TABLE_FONT_SIZE);
    if highlighted {
        base.bold().filled(highlight)
    } else {
        base
    }
}

fn header_style() -> CellStyle {
    CellStyle::table(TABLE_FONT_SIZE).bold()
}

struct ReportLayout<'a> {
    report: &'a Report,
    options: &'a ReportOptions,
    labels: &'static Labels,
}

impl ReportLayout<'_> {
    // ── Building blocks ──────────────────────────────────────────────────

    fn section_title(&self, canvas: &mut Canvas, title: &str) {
        canvas.ln(SECTION_GAP);
        // Keep the title on the same page as at least two lines after it.
        canvas.ensure_space(SECTION_TITLE_HEIGHT + 2.0 * LINE_HEIGHT);
        canvas.cell(
            0.0,
            SECTION_TITLE_HEIGHT,
            title,
            &CellStyle::text(SECTION_FONT_SIZE).bold().centered(),
            Flow::NextLine,
        );
    }

    fn label_value(&self, canvas: &mut Canvas, label: &str, value: &str) {
        canvas.ensure_space(LINE_HEIGHT);
        let label = format!("{label}:");
        let label_style = CellStyle::text(BODY_FONT_SIZE).bold();
        let label_width = canvas
            .fonts()
            .measure_text_width(&label, BODY_FONT_SIZE, true)
            + 2.0 * CELL_PADDING;
        canvas.cell(label_width, LINE_HEIGHT, &label, &label_style, Flow::Right);
        canvas.multi_cell(0.0, LINE_HEIGHT, value, &CellStyle::text(BODY_FONT_SIZE));
    }

    fn sentence(&self, canvas: &mut Canvas, text: &str) {
        canvas.multi_cell(0.0, PARAGRAPH_LINE_HEIGHT, text, &CellStyle::text(BODY_FONT_SIZE));
    }

    /// Bordered table with a bold header row. Rows start at `left` and grow
    /// to fit wrapped cells. A row is never split across pages, and the header
    /// row is repeated on continuation pages.
    fn table<const N: usize>(
        &self,
        canvas: &mut Canvas,
        left: f32,
        widths: &[f32; N],
        headers: &[&str; N],
        rows: impl Iterator<Item = ([String; N], bool)>,
    ) {
        let header_cells: Vec<(f32, &str)> = widths
            .iter()
            .copied()
            .zip(headers.iter().copied())
            .collect();
        let draw_header = |canvas: &mut Canvas| {
            canvas.set_x(left);
            canvas.row(&header_cells, ROW_HEIGHT, &header_style());
        };

        canvas.ensure_space(2.0 * ROW_HEIGHT);
        draw_header(canvas);

        for (texts, highlighted) in rows {
            let style = row_style(highlighted, self.options.highlight_color);
            let cells: Vec<(f32, &str)> = widths
                .iter()
                .copied()
                .zip(texts.iter().map(String::as_str))
                .collect();
            let height = canvas.row_height(&cells, ROW_HEIGHT, &style);
            if canvas.ensure_space(height) {
                draw_header(canvas);
            }
            canvas.set_x(left);
            canvas.row(&cells, ROW_HEIGHT, &style);
        }
    }

    // ── Sections ─────────────────────────────────────────────────────────

    fn boilerplate(&self, canvas: &mut Canvas) {
        log::debug!("drawing explanatory section");
        self.section_title(canvas, self.labels.about_title);
        let body = CellStyle::text(BODY_FONT_SIZE);
        let margin = canvas.geometry().margin_x;

        for section in self.labels.boilerplate {
            canvas.ln(4.0);
            canvas.ensure_space(LINE_HEIGHT + PARAGRAPH_LINE_HEIGHT);
            canvas.cell(
                0.0,
                LINE_HEIGHT,
                section.heading,
                &CellStyle::text(BODY_FONT_SIZE).bold(),
                Flow::NextLine,
            );
            for block in section.blocks {
                match block {
                    Block::Paragraph(text) => self.sentence(canvas, text),
                    Block::Bullets(items) => {
                        for item in *items {
                            canvas.ensure_space(PARAGRAPH_LINE_HEIGHT);
                            canvas.set_x(margin + BULLET_INDENT);
                            canvas.cell(BULLET_WIDTH, PARAGRAPH_LINE_HEIGHT, "\u{2022}", &body, Flow::Right);
                            canvas.multi_cell(0.0, PARAGRAPH_LINE_HEIGHT, item, &body);
                        }
                    }
                }
            }
        }
    }

    fn summary(&self, canvas: &mut Canvas) {
        let report = self.report;
        let params = report.params();
        let labels = self.labels;
        self.section_title(canvas, labels.summary_title);
        self.label_value(canvas, labels.monitored_plate, &params.monitored_plate);
        self.label_value(canvas, labels.search_window, &params.search_window.display());
        self.label_value(canvas, labels.plate_limit, &params.plate_limit.to_string());
        self.label_value(
            canvas,
            labels.total_monitored,
            &report.total_monitored_detections().to_string(),
        );
        self.label_value(
            canvas,
            labels.total_all,
            &report.total_all_detections().to_string(),
        );
    }

    fn ranking(&self, canvas: &mut Canvas) {
        self.section_title(canvas, self.labels.ranking_title);
        let ranking = self.report.ranking();
        if ranking.is_empty() {
            self.sentence(canvas, self.labels.no_ranking);
            return;
        }

        // Computed once; automatic breaks send x back to the margin, so the
        // table re-applies it on every row.
        let offset = (canvas.geometry().width - table_width(&RANKING_COLUMNS)) / 2.0;
        let rows = ranking.iter().map(|entry| {
            (
                [entry.plate.clone(), entry.count.to_string()],
                self.report.is_monitored(&entry.plate),
            )
        });
        self.table(canvas, offset, &RANKING_COLUMNS, &self.labels.ranking_headers, rows);
    }

    fn groups(&self, canvas: &mut Canvas) {
        let groups = self.report.groups();
        if groups.is_empty() {
            self.section_title(canvas, self.labels.no_groups_title);
            self.sentence(canvas, self.labels.no_groups);
            return;
        }
        for (index, group) in groups.iter().enumerate() {
            self.group(canvas, index, groups.len(), group);
        }
    }

    fn group(&self, canvas: &mut Canvas, index: usize, count: usize, group: &DetectionGroup) {
        log::debug!("drawing detection group {} of {}", index + 1, count);
        let labels = self.labels;
        self.section_title(canvas, &labels.group_title(index, count));

        self.label_value(canvas, labels.detection_time, &group.detection_time.display());
        self.label_value(canvas, labels.analysed_window, &group.window.display());
        self.label_value(canvas, labels.radars, &group.radars.join(", "));
        self.label_value(
            canvas,
            labels.coordinates,
            &format!("{}, {}", group.location.latitude, group.location.longitude),
        );
        self.label_value(canvas, labels.address, &group.location.address);
        self.label_value(canvas, labels.total_detections, &group.total_detections.to_string());
        canvas.ln(6.0);

        if group.detections.is_empty() {
            self.sentence(canvas, labels.no_detections);
        } else {
            let left = canvas.geometry().margin_x;
            let rows = group
                .detections
                .iter()
                .map(|d| (detection_cells(d), self.report.is_monitored(&d.plate)));
            self.table(canvas, left, &DETECTION_COLUMNS, &labels.detection_headers, rows);
        }

        canvas.ensure_space(LINE_HEIGHT);
        canvas.cell(
            0.0,
            LINE_HEIGHT,
            &labels.table_caption(index + 1),
            &CellStyle::text(CAPTION_FONT_SIZE).centered(),
            Flow::NextLine,
        );
    }
}

fn detection_cells(d: &Detection) -> [String; 6] {
    [
        d.timestamp.display(),
        d.plate.clone(),
        d.radar_id.clone(),
        d.lane.clone(),
        d.speed_kmh.to_string(),
        d.occurrence_count.to_string(),
    ]
}

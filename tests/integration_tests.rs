//! Integration tests for the joint report pipeline.
//!
//! These tests validate:
//! - Input validation and the aggregates derived from it
//! - Date display and report id formats
//! - The running header and row-granular pagination
//! - Highlighting of the monitored plate
//! - Cell text is never cut; rows grow to fit wrapped cells
//! - PDF output exists, has valid format and is reproducible byte for byte

use std::collections::BTreeMap;
use std::io::Cursor;

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use joint_report::assets::{LogoAsset, ReportAssets};
use joint_report::canvas::CELL_PADDING;
use joint_report::fonts::FontManager;
use joint_report::labels::{Language, ENGLISH, PORTUGUESE};
use joint_report::layout_config::{LayoutBox, LayoutConfig};
use joint_report::model::Report;
use joint_report::pipeline::{
    compute_report_layout, generate_report, generate_report_from_json, ReportOptions,
};
use joint_report::render::render_pdf;
use joint_report::style::{Rgb, ROW_HEIGHT, TABLE_FONT_SIZE};
use joint_report::templates;
use joint_report::{ReportError, ValidationError};

// =====================================================================
// Helpers
// =====================================================================

fn clock() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_milli_opt(10, 0, 0, 123))
        .unwrap()
}

fn report(data: &str) -> Report {
    Report::from_json_strs_at(templates::params_json(), data, templates::ranking_json(), clock())
        .unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([20, 60, 140]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn assets() -> ReportAssets {
    ReportAssets::from_logos(
        LogoAsset::from_bytes(png(70, 40)).unwrap(),
        LogoAsset::from_bytes(png(76, 40)).unwrap(),
    )
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

/// One group holding a single detection with the given timestamp and radar.
fn one_detection_json(timestamp: &str, radar: &str) -> String {
    format!(
        r#"[{{
            "detectionTime": "2024-06-03T08:15:30.000Z",
            "window": {{"start": "2024-06-03T08:10:30.000Z", "end": "2024-06-03T08:20:30.000Z"}},
            "radars": ["{radar}"],
            "location": {{"latitude": -23.56, "longitude": -46.65, "address": "Av. Paulista, 1578"}},
            "totalDetections": 1,
            "detections": [
                {{"timestamp": "{timestamp}", "plate": "FGH4I56", "radarId": "{radar}", "lane": "1", "speedKmh": 48, "occurrenceCount": 1}}
            ]
        }}]"#
    )
}

/// printpdf writes two random strings into the trailer `/ID`; blank them so
/// the rest of the document can be compared byte for byte.
fn mask_document_id(mut pdf: Vec<u8>) -> Vec<u8> {
    let start = pdf
        .windows(4)
        .position(|w| w == b"/ID[")
        .expect("trailer /ID");
    let len = pdf[start..].iter().position(|&b| b == b']').unwrap();
    pdf[start..start + len].fill(b'0');
    pdf
}

/// Bordered table cells grouped by (page, y), in drawing order.
fn table_rows(layout: &LayoutConfig) -> BTreeMap<(usize, i64), Vec<&LayoutBox>> {
    let mut rows: BTreeMap<(usize, i64), Vec<&LayoutBox>> = BTreeMap::new();
    for page in &layout.pages {
        for b in &page.boxes {
            if b.border.is_some() && (b.height - ROW_HEIGHT).abs() < 0.01 {
                rows.entry((page.page_index, (b.y * 100.0).round() as i64))
                    .or_default()
                    .push(b);
            }
        }
    }
    rows
}

// =====================================================================
// Loading and validation
// =====================================================================

#[test]
fn report_id_comes_from_clock() {
    let r = report(templates::single_group_json());
    assert_eq!(r.report_id(), "20240601.100000123");
}

#[test]
fn preset_report_id_is_kept() {
    let params = r#"{"plate":"ABC1D23","startTime":"2024-06-01T00:00:00","endTime":"2024-06-02T00:00:00","nPlates":"7","reportId":"CASE-42"}"#;
    let r = Report::from_json_strs_at(params, "[]", "[]", clock()).unwrap();
    assert_eq!(r.report_id(), "CASE-42");
    assert_eq!(r.params().plate_limit, 7);
}

#[test]
fn report_id_unsafe_for_file_names_is_rejected() {
    let params = r#"{"plate":"ABC1D23","startTime":"2024-06-01T00:00:00","endTime":"2024-06-02T00:00:00","nPlates":3,"reportId":"../../tmp/x\r\nSet-Cookie: a=b"}"#;
    let err = generate_report_from_json(params, "[]", "[]", &ReportOptions::default(), &assets())
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Validation(ValidationError::InvalidField { ref field, .. }) if field == "reportId"
    ));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn missing_params_field_is_rejected() {
    let err = Report::from_json_strs_at(
        r#"{"plate":"ABC1D23","startTime":"2024-06-01T00:00:00","nPlates":3}"#,
        "[]",
        "[]",
        clock(),
    )
    .unwrap_err();
    assert_eq!(err, ValidationError::MissingField("endTime"));
    assert_eq!(ReportError::from(err).status_code(), 400);
}

#[test]
fn malformed_json_is_rejected() {
    let err = Report::from_json_strs_at(templates::params_json(), "[{", "[]", clock()).unwrap_err();
    assert!(matches!(err, ValidationError::Json { .. }));
}

#[test]
fn aggregates_follow_groups() {
    let r = report(templates::multi_group_json());
    assert_eq!(r.groups().len(), 3);
    assert_eq!(r.total_monitored_detections(), 3);
    assert_eq!(r.total_all_detections(), 5);

    let empty = report("[]");
    assert_eq!(empty.total_monitored_detections(), 0);
    assert_eq!(empty.total_all_detections(), 0);
}

// =====================================================================
// Layout content
// =====================================================================

#[test]
fn dates_are_displayed_day_first() {
    let layout = compute_report_layout(&report(templates::single_group_json()), &ReportOptions::default());
    let texts = layout.all_texts();
    assert!(texts.contains(&"01/06/2024 00:00:00 - 07/06/2024 23:59:59"));
    assert!(texts.contains(&"03/06/2024 08:15:30"));
    // Second-precision input without milliseconds parses too.
    assert!(texts.contains(&"03/06/2024 08:19:10"));
}

#[test]
fn single_group_is_titled_single() {
    let layout = compute_report_layout(&report(templates::single_group_json()), &ReportOptions::default());
    let texts = layout.all_texts();
    assert!(texts.contains(&ENGLISH.group_title(0, 1).as_str()));
    assert!(texts.contains(&ENGLISH.table_caption(1).as_str()));
    assert!(!texts.iter().any(|t| t.starts_with("DETECTION 1 ")));
}

#[test]
fn multiple_groups_are_numbered_in_order() {
    let layout = compute_report_layout(&report(templates::multi_group_json()), &ReportOptions::default());
    let texts = layout.all_texts();
    let positions: Vec<usize> = (0..3)
        .map(|i| {
            let title = ENGLISH.group_title(i, 3);
            texts.iter().position(|t| *t == title).unwrap()
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    for n in 1..=3 {
        assert!(texts.contains(&ENGLISH.table_caption(n).as_str()), "caption {n} missing");
    }
}

#[test]
fn monitored_plate_rows_are_highlighted() {
    let layout = compute_report_layout(&report(templates::single_group_json()), &ReportOptions::default());
    for cells in table_rows(&layout).values() {
        let monitored = cells.iter().any(|b| b.text_str() == Some("ABC1D23"));
        for cell in cells {
            if monitored {
                assert_eq!(cell.fill, Some(Rgb::YELLOW.to_array()));
                assert!(cell.text.as_ref().map_or(true, |t| t.bold));
            } else {
                assert_eq!(cell.fill, None, "fill bled into {:?}", cell.text_str());
            }
        }
    }
}

#[test]
fn highlight_color_is_configurable() {
    let options: ReportOptions = serde_json::from_str(r##"{"highlight_color": "#00ff00"}"##).unwrap();
    let layout = compute_report_layout(&report(templates::single_group_json()), &options);
    let filled: Vec<_> = table_rows(&layout)
        .into_values()
        .flatten()
        .filter_map(|b| b.fill)
        .collect();
    assert!(!filled.is_empty());
    assert!(filled.iter().all(|f| *f == [0.0, 1.0, 0.0]));
}

#[test]
fn boilerplate_flag_adds_explanatory_section() {
    let r = report(templates::single_group_json());
    let plain = compute_report_layout(&r, &ReportOptions::default());
    let options = ReportOptions {
        include_boilerplate: true,
        ..ReportOptions::default()
    };
    let full = compute_report_layout(&r, &options);
    assert!(!plain.all_texts().contains(&"ABOUT THIS REPORT"));
    assert!(full.all_texts().contains(&"ABOUT THIS REPORT"));
    assert!(full.all_texts().len() > plain.all_texts().len());
}

#[test]
fn raw_timestamp_is_shown_whole() {
    let raw = "2024-06-01T10:00:00.500+02:00";
    let layout = compute_report_layout(
        &report(&one_detection_json(raw, "RD-104")),
        &ReportOptions::default(),
    );
    assert!(!layout.all_texts().iter().any(|t| t.contains("...")));

    let cell = table_rows(&layout)
        .into_values()
        .flatten()
        .find(|b| b.text_str() == Some(raw))
        .expect("raw timestamp cell");
    let text = cell.text.as_ref().unwrap();
    assert!(text.font_size < TABLE_FONT_SIZE);
    let width = FontManager::new().measure_text_width(raw, text.font_size, text.bold);
    assert!(width <= cell.width - 2.0 * CELL_PADDING + 0.01);
}

#[test]
fn overlong_cells_grow_their_row() {
    let radar = "RADAR-AVENIDA-PAULISTA-SENTIDO-CONSOLACAO-0001";
    let layout = compute_report_layout(
        &report(&one_detection_json("2024-06-03T08:14:02.000Z", radar)),
        &ReportOptions::default(),
    );
    let boxes = &layout.pages[0].boxes;

    // The radar column is 90pt wide; its lines rebuild the id exactly.
    let lines: Vec<&LayoutBox> = boxes
        .iter()
        .filter(|b| b.border.is_none() && (b.width - 90.0).abs() < 0.01 && b.text.is_some())
        .collect();
    assert!(lines.len() > 1);
    let joined: String = lines.iter().filter_map(|b| b.text_str()).collect();
    assert_eq!(joined, radar);

    // Every cell of that row spans all of its lines.
    let row: Vec<&LayoutBox> = boxes
        .iter()
        .filter(|b| b.border.is_some() && (b.y - lines[0].y).abs() < 0.01)
        .collect();
    assert_eq!(row.len(), 6);
    for cell in row {
        assert!((cell.height - lines.len() as f32 * ROW_HEIGHT).abs() < 0.01);
    }
}

#[test]
fn portuguese_labels_are_an_option() {
    let options: ReportOptions = serde_json::from_str(r#"{"language": "pt"}"#).unwrap();
    assert_eq!(options.language, Language::Pt);
    let r = report(templates::multi_group_json());
    let generated = generate_report(&r, &options, &assets()).unwrap();
    assert_valid_pdf(&generated.pdf);

    let texts = generated.layout.all_texts();
    assert!(texts.contains(&PORTUGUESE.report_title));
    assert!(texts.contains(&PORTUGUESE.group_title(2, 3).as_str()));
    assert!(texts.contains(&"Placa"));
    assert!(!texts.contains(&ENGLISH.report_title));
}

// =====================================================================
// Pagination
// =====================================================================

#[test]
fn header_repeats_on_every_page() {
    let r = report(&templates::long_table_json(150));
    let layout = compute_report_layout(&r, &ReportOptions::default());
    assert!(layout.pages.len() >= 3, "expected a multi-page report");

    let id_line = format!("ID: {}", r.report_id());
    for page in 0..layout.pages.len() {
        let texts = layout.page_texts(page);
        assert_eq!(&texts[..2], &[ENGLISH.report_title, id_line.as_str()], "page {page}");
    }
    assert_eq!(layout.asset_keys(), vec!["logo_left", "logo_right"]);
}

#[test]
fn table_rows_never_split_across_pages() {
    let rows = 150;
    let layout = compute_report_layout(&report(&templates::long_table_json(rows)), &ReportOptions::default());
    let grouped = table_rows(&layout);

    for ((page, _), cells) in &grouped {
        assert!(
            cells.len() == 2 || cells.len() == 6,
            "row on page {page} has {} cells",
            cells.len()
        );
    }

    let detection_rows = grouped
        .values()
        .filter(|cells| cells.len() == 6 && cells[0].text_str() != Some("Date/time"))
        .count();
    assert_eq!(detection_rows, rows);

    // The column header is repeated on every page the table reaches.
    let pages_with_rows: std::collections::BTreeSet<usize> = grouped
        .iter()
        .filter(|(_, cells)| cells.len() == 6)
        .map(|((page, _), _)| *page)
        .collect();
    for page in pages_with_rows {
        assert!(layout.page_texts(page).contains(&"Date/time"), "page {page}");
    }

    let bottom = layout.page_height_pt - ReportOptions::default().margins.vertical;
    for page in &layout.pages {
        for b in &page.boxes {
            assert!(b.bottom() <= bottom + 0.01, "box below margin on page {}", page.page_index);
        }
    }
}

// =====================================================================
// Rendering
// =====================================================================

#[test]
fn generate_pdf_from_samples() {
    let generated = generate_report(
        &report(templates::multi_group_json()),
        &ReportOptions::default(),
        &assets(),
    )
    .unwrap();
    assert_valid_pdf(&generated.pdf);
    assert_eq!(generated.file_name(), "report_20240601.100000123.pdf");
}

#[test]
fn output_is_reproducible() {
    let r = report(&templates::long_table_json(60));
    let options = ReportOptions::default();
    let digest = |layout: &LayoutConfig| Sha256::digest(layout.to_json().as_bytes());

    let a = generate_report(&r, &options, &assets()).unwrap();
    let b = generate_report(&r, &options, &assets()).unwrap();
    assert_eq!(digest(&a.layout), digest(&b.layout));
    assert_eq!(mask_document_id(a.pdf.clone()), mask_document_id(b.pdf));

    // Masking leaves real differences visible.
    let green = ReportOptions {
        highlight_color: Rgb::new(0.0, 1.0, 0.0),
        ..options
    };
    let c = generate_report(&r, &green, &assets()).unwrap();
    assert_ne!(mask_document_id(a.pdf), mask_document_id(c.pdf));
}

#[test]
fn layout_json_roundtrip_renders() {
    let layout = compute_report_layout(&report(templates::single_group_json()), &ReportOptions::default());
    let restored = LayoutConfig::from_json(&layout.to_json()).unwrap();
    assert_eq!(restored, layout);
    assert_valid_pdf(&render_pdf(&restored, &assets()).unwrap());
}

#[test]
fn missing_logo_fails_rendering() {
    let layout = compute_report_layout(&report("[]"), &ReportOptions::default());
    let err = render_pdf(&layout, &ReportAssets::default()).unwrap_err();
    assert!(matches!(err, ReportError::Config(_)));
    assert_eq!(err.status_code(), 500);
}

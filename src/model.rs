//! Report data model – validates the three input documents (`params`,
//! `data`, `ranking`) and exposes the entities the layout engine draws.
//!
//! A [`Report`] is assembled once per request and never mutated afterwards.
//! The report identifier and the two summary aggregates are fixed at
//! construction time.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::dates::{format_date, generate_report_id, parse_timestamp};
use crate::error::ValidationError;

const PARAMS_DOC: &str = "params";
const DATA_DOC: &str = "data";
const RANKING_DOC: &str = "ranking";

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A timestamp exactly as received. Formatting for display falls back to the
/// raw text, so a malformed value never aborts a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn parsed(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.0)
    }

    pub fn is_well_formed(&self) -> bool {
        self.parsed().is_some()
    }

    /// `DD/MM/YYYY HH:MM:SS`, or the raw string.
    pub fn display(&self) -> String {
        format_date(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn display(&self) -> String {
        format!("{} - {}", self.start.display(), self.end.display())
    }

    /// False only when both ends parse and `start` is later than `end`.
    pub fn is_ordered(&self) -> bool {
        match (self.start.parsed(), self.end.parsed()) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    fn contains(&self, ts: &Timestamp) -> Option<bool> {
        let (start, end, t) = (self.start.parsed()?, self.end.parsed()?, ts.parsed()?);
        Some(start <= t && t <= end)
    }
}

/// Search parameters of the investigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportParams {
    pub monitored_plate: String,
    pub search_window: TimeWindow,
    /// Maximum number of co-occurring plates considered before/after each pass.
    pub plate_limit: u32,
    pub report_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
}

/// A single plate read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub timestamp: Timestamp,
    #[serde(deserialize_with = "lenient_string")]
    pub plate: String,
    #[serde(deserialize_with = "lenient_string")]
    pub radar_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub lane: String,
    pub speed_kmh: f64,
    pub occurrence_count: u32,
}

/// One pass of the monitored plate plus everything seen around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionGroup {
    pub detection_time: Timestamp,
    pub window: TimeWindow,
    #[serde(deserialize_with = "lenient_strings")]
    pub radars: Vec<String>,
    pub location: Location,
    /// Upstream count; kept as given rather than recomputed.
    pub total_detections: u64,
    /// Chronological, in source order.
    #[serde(default)]
    pub detections: Vec<Detection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub plate: String,
    pub count: u64,
}

/// The assembled report. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    params: ReportParams,
    groups: Vec<DetectionGroup>,
    ranking: Vec<RankingEntry>,
    total_monitored_detections: usize,
    total_all_detections: u64,
    #[serde(skip)]
    generated_at: NaiveDateTime,
}

impl Report {
    /// Build a report from already-validated parts, computing the aggregates.
    pub fn new(
        params: ReportParams,
        groups: Vec<DetectionGroup>,
        ranking: Vec<RankingEntry>,
    ) -> Self {
        let total_monitored_detections = groups.len();
        let total_all_detections = groups.iter().map(|g| g.total_detections).sum();
        Self {
            params,
            groups,
            ranking,
            total_monitored_detections,
            total_all_detections,
            generated_at: Local::now().naive_local(),
        }
    }

    /// Validate the three documents, stamping the report id from the local clock.
    pub fn load(params: &Value, data: &Value, ranking: &Value) -> Result<Self, ValidationError> {
        Self::load_at(params, data, ranking, Local::now().naive_local())
    }

    /// Like [`Report::load`] with an explicit clock for the report id and
    /// the generation time.
    pub fn load_at(
        params: &Value,
        data: &Value,
        ranking: &Value,
        now: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let params = load_params(params, now)?;
        let groups = load_groups(data)?;
        let ranking = load_ranking(ranking)?;
        log::debug!(
            "loaded report {} for plate {}: {} group(s), {} ranking entr{}",
            params.report_id,
            params.monitored_plate,
            groups.len(),
            ranking.len(),
            if ranking.len() == 1 { "y" } else { "ies" }
        );
        Ok(Self {
            generated_at: now,
            ..Self::new(params, groups, ranking)
        })
    }

    /// Parse the three documents from JSON text, then [`Report::load_at`].
    pub fn from_json_strs_at(
        params: &str,
        data: &str,
        ranking: &str,
        now: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let params = parse_document(PARAMS_DOC, params)?;
        let data = parse_document(DATA_DOC, data)?;
        let ranking = parse_document(RANKING_DOC, ranking)?;
        Self::load_at(&params, &data, &ranking, now)
    }

    pub fn from_json_strs(params: &str, data: &str, ranking: &str) -> Result<Self, ValidationError> {
        Self::from_json_strs_at(params, data, ranking, Local::now().naive_local())
    }

    pub fn params(&self) -> &ReportParams {
        &self.params
    }

    pub fn groups(&self) -> &[DetectionGroup] {
        &self.groups
    }

    pub fn ranking(&self) -> &[RankingEntry] {
        &self.ranking
    }

    pub fn report_id(&self) -> &str {
        &self.params.report_id
    }

    /// Clock reading the report was loaded at; stamped into the PDF metadata.
    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    pub fn monitored_plate(&self) -> &str {
        &self.params.monitored_plate
    }

    /// True when `plate` is the plate under investigation.
    pub fn is_monitored(&self, plate: &str) -> bool {
        plate == self.params.monitored_plate
    }

    /// Number of passes of the monitored plate.
    pub fn total_monitored_detections(&self) -> usize {
        self.total_monitored_detections
    }

    /// Sum of every group's upstream detection count.
    pub fn total_all_detections(&self) -> u64 {
        self.total_all_detections
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn parse_document(document: &'static str, text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|e| ValidationError::Json {
        document,
        message: e.to_string(),
    })
}

fn load_params(raw: &Value, now: NaiveDateTime) -> Result<ReportParams, ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::NotAnObject(PARAMS_DOC))?;

    let plate = required_str(obj, "plate")?;
    if plate.trim().is_empty() {
        return Err(ValidationError::EmptyField("plate"));
    }
    let start = Timestamp::new(required_str(obj, "startTime")?);
    let end = Timestamp::new(required_str(obj, "endTime")?);
    let plate_limit = required_count(obj, "nPlates")?;

    let search_window = TimeWindow { start, end };
    for ts in [&search_window.start, &search_window.end] {
        warn_if_malformed(ts, "search window");
    }
    if !search_window.is_ordered() {
        return Err(ValidationError::InvertedWindow {
            start: search_window.start.raw().to_string(),
            end: search_window.end.raw().to_string(),
        });
    }

    let report_id = match obj.get("reportId").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {
            if let Some(bad) = id.chars().find(|c| !is_report_id_char(*c)) {
                return Err(ValidationError::InvalidField {
                    field: "reportId".to_string(),
                    reason: format!(
                        "{bad:?} is not allowed; use ASCII letters, digits, '.', '_' or '-'"
                    ),
                });
            }
            id.to_string()
        }
        _ => generate_report_id(now),
    };

    Ok(ReportParams {
        monitored_plate: plate.to_string(),
        search_window,
        plate_limit,
        report_id,
    })
}

/// Characters allowed in a preset report id. The id names the output file.
pub fn is_report_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn load_groups(raw: &Value) -> Result<Vec<DetectionGroup>, ValidationError> {
    let items = raw.as_array().ok_or(ValidationError::NotAnArray(DATA_DOC))?;
    let mut groups = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let group = DetectionGroup::deserialize(item).map_err(|e| ValidationError::InvalidField {
            field: format!("{DATA_DOC}[{i}]"),
            reason: e.to_string(),
        })?;

        if group.radars.is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("{DATA_DOC}[{i}].radars"),
                reason: "at least one radar is required".to_string(),
            });
        }
        if let Some(j) = group.detections.iter().position(|d| d.occurrence_count == 0) {
            return Err(ValidationError::InvalidField {
                field: format!("{DATA_DOC}[{i}].detections[{j}].occurrenceCount"),
                reason: "must be at least 1".to_string(),
            });
        }

        warn_if_malformed(&group.detection_time, "detection time");
        warn_if_malformed(&group.window.start, "group window");
        warn_if_malformed(&group.window.end, "group window");
        for d in &group.detections {
            warn_if_malformed(&d.timestamp, "detection");
        }
        if group.window.contains(&group.detection_time) == Some(false) {
            log::warn!(
                "group {}: detection time {} lies outside its window",
                i + 1,
                group.detection_time.raw()
            );
        }
        if !group.detections.is_empty() && group.detections.len() as u64 != group.total_detections {
            log::warn!(
                "group {}: totalDetections is {} but {} detections were supplied",
                i + 1,
                group.total_detections,
                group.detections.len()
            );
        }

        groups.push(group);
    }
    Ok(groups)
}

fn load_ranking(raw: &Value) -> Result<Vec<RankingEntry>, ValidationError> {
    let items = raw.as_array().ok_or(ValidationError::NotAnArray(RANKING_DOC))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let entry = RankingEntry::deserialize(item).map_err(|e| ValidationError::InvalidField {
                field: format!("{RANKING_DOC}[{i}]"),
                reason: e.to_string(),
            })?;
            if entry.count == 0 {
                return Err(ValidationError::InvalidField {
                    field: format!("{RANKING_DOC}[{i}].count"),
                    reason: "must be at least 1".to_string(),
                });
            }
            Ok(entry)
        })
        .collect()
}

fn warn_if_malformed(ts: &Timestamp, what: &str) {
    if !ts.is_well_formed() {
        log::warn!("unrecognised {what} timestamp {:?}; shown as-is", ts.raw());
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ValidationError::InvalidField {
            field: field.to_string(),
            reason: format!("expected a string, got {other}"),
        }),
    }
}

/// Non-negative integer, given either as a JSON number or a numeric string.
fn required_count(obj: &Map<String, Value>, field: &'static str) -> Result<u32, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidField {
        field: field.to_string(),
        reason,
    };
    let n = match obj.get(field) {
        None | Some(Value::Null) => return Err(ValidationError::MissingField(field)),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| invalid(format!("expected a non-negative integer, got {n}")))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(format!("expected a non-negative integer, got {s:?}")))?,
        Some(other) => return Err(invalid(format!("expected an integer, got {other}"))),
    };
    u32::try_from(n).map_err(|_| invalid(format!("{n} is out of range")))
}

/// Identifiers such as lanes and radar ids are sometimes sent as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or number, got {other}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 123)
            .unwrap()
    }

    fn params() -> Value {
        json!({
            "plate": "ABC1D23",
            "startTime": "2024-06-01T00:00:00.000Z",
            "endTime": "2024-06-02T00:00:00.000Z",
            "nPlates": 5
        })
    }

    fn group(total: u64, detections: Value) -> Value {
        json!({
            "detectionTime": "2024-06-01T10:00:00.000Z",
            "window": {"start": "2024-06-01T09:55:00.000Z", "end": "2024-06-01T10:05:00.000Z"},
            "radars": ["R-01", 7],
            "location": {"latitude": -23.55, "longitude": -46.63, "address": "Av. Paulista"},
            "totalDetections": total,
            "detections": detections
        })
    }

    #[test]
    fn loads_minimal_report() {
        let report = Report::load_at(&params(), &json!([]), &json!([]), clock()).unwrap();
        assert_eq!(report.monitored_plate(), "ABC1D23");
        assert_eq!(report.params().plate_limit, 5);
        assert_eq!(report.report_id(), "20240601.100000123");
        assert_eq!(report.total_monitored_detections(), 0);
        assert_eq!(report.total_all_detections(), 0);
    }

    #[test]
    fn preset_report_id_wins() {
        let mut p = params();
        p["reportId"] = json!("FIXED.1");
        let report = Report::load_at(&p, &json!([]), &json!([]), clock()).unwrap();
        assert_eq!(report.report_id(), "FIXED.1");
    }

    #[test]
    fn report_id_outside_file_name_chars_is_rejected() {
        for id in ["../../tmp/x", "a\r\nSet-Cookie: a=b", "case 42", "caso-ç"] {
            let mut p = params();
            p["reportId"] = json!(id);
            let err = Report::load_at(&p, &json!([]), &json!([]), clock()).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidField { ref field, .. } if field == "reportId"),
                "{id:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn load_clock_is_generation_time() {
        let report = Report::load_at(&params(), &json!([]), &json!([]), clock()).unwrap();
        assert_eq!(report.generated_at(), clock());
    }

    #[test]
    fn missing_required_fields() {
        for field in ["plate", "startTime", "endTime", "nPlates"] {
            let mut p = params();
            p.as_object_mut().unwrap().remove(field);
            let err = Report::load_at(&p, &json!([]), &json!([]), clock()).unwrap_err();
            assert_eq!(err, ValidationError::MissingField(field));
        }
    }

    #[test]
    fn empty_plate_rejected() {
        let mut p = params();
        p["plate"] = json!("  ");
        let err = Report::load_at(&p, &json!([]), &json!([]), clock()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("plate"));
    }

    #[test]
    fn plate_limit_accepts_numeric_string() {
        let mut p = params();
        p["nPlates"] = json!("12");
        let report = Report::load_at(&p, &json!([]), &json!([]), clock()).unwrap();
        assert_eq!(report.params().plate_limit, 12);

        p["nPlates"] = json!(-1);
        assert!(matches!(
            Report::load_at(&p, &json!([]), &json!([]), clock()),
            Err(ValidationError::InvalidField { .. })
        ));
    }

    #[test]
    fn non_array_documents_rejected() {
        let err = Report::load_at(&params(), &json!({}), &json!([]), clock()).unwrap_err();
        assert_eq!(err, ValidationError::NotAnArray("data"));
        let err = Report::load_at(&params(), &json!([]), &json!("x"), clock()).unwrap_err();
        assert_eq!(err, ValidationError::NotAnArray("ranking"));
        let err = Report::load_at(&json!([]), &json!([]), &json!([]), clock()).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject("params"));
    }

    #[test]
    fn malformed_timestamps_are_not_fatal() {
        let mut p = params();
        p["startTime"] = json!("yesterday");
        let report = Report::load_at(&p, &json!([]), &json!([]), clock()).unwrap();
        assert_eq!(report.params().search_window.start.display(), "yesterday");
        assert_eq!(
            report.params().search_window.display(),
            "yesterday - 02/06/2024 00:00:00"
        );
    }

    #[test]
    fn inverted_window_rejected() {
        let mut p = params();
        p["startTime"] = json!("2024-06-03T00:00:00");
        assert!(matches!(
            Report::load_at(&p, &json!([]), &json!([]), clock()),
            Err(ValidationError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn aggregates_sum_upstream_counts() {
        let detection = json!({
            "timestamp": "2024-06-01T10:00:00.000Z",
            "plate": "XYZ9876",
            "radarId": "R-01",
            "lane": 2,
            "speedKmh": 54.5,
            "occurrenceCount": 1
        });
        let data = json!([group(1, json!([detection])), group(40, json!([])), group(0, json!([]))]);
        let report = Report::load_at(&params(), &data, &json!([]), clock()).unwrap();
        assert_eq!(report.total_monitored_detections(), 3);
        assert_eq!(report.total_all_detections(), 41);

        let g = &report.groups()[0];
        assert_eq!(g.radars, vec!["R-01".to_string(), "7".to_string()]);
        assert_eq!(g.detections[0].lane, "2");
    }

    #[test]
    fn empty_radar_list_rejected() {
        let mut g = group(0, json!([]));
        g["radars"] = json!([]);
        let err = Report::load_at(&params(), &json!([g]), &json!([]), clock()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "data[0].radars"));
    }

    #[test]
    fn ranking_keeps_source_order() {
        let ranking = json!([
            {"plate": "AAA0001", "count": 3},
            {"plate": "ABC1D23", "count": 3},
            {"plate": "BBB0002", "count": 1}
        ]);
        let report = Report::load_at(&params(), &json!([]), &ranking, clock()).unwrap();
        let plates: Vec<_> = report.ranking().iter().map(|r| r.plate.as_str()).collect();
        assert_eq!(plates, ["AAA0001", "ABC1D23", "BBB0002"]);
        assert!(report.is_monitored("ABC1D23"));
        assert!(!report.is_monitored("AAA0001"));
    }

    #[test]
    fn bad_json_text_reports_document() {
        let err = Report::from_json_strs_at("{", "[]", "[]", clock()).unwrap_err();
        assert!(matches!(err, ValidationError::Json { document: "params", .. }));
    }
}

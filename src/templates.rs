//! Sample input documents for testing and demonstration.
//!
//! Each function returns one of the three JSON documents the report is built
//! from. The CLI's `--demo` flag renders them.

/// Search parameters for plate `ABC1D23`, without a preset report id.
pub fn params_json() -> &'static str {
    r#"{
    "plate": "ABC1D23",
    "startTime": "2024-06-01T00:00:00.000Z",
    "endTime": "2024-06-07T23:59:59.000Z",
    "nPlates": 5
}"#
}

/// Co-occurrence ranking that includes the monitored plate itself.
pub fn ranking_json() -> &'static str {
    r#"[
    {"plate": "FGH4I56", "count": 4},
    {"plate": "ABC1D23", "count": 3},
    {"plate": "JKL7M89", "count": 3},
    {"plate": "QRS0T12", "count": 1}
]"#
}

/// A single pass of the monitored plate.
pub fn single_group_json() -> &'static str {
    r#"[
    {
        "detectionTime": "2024-06-03T08:15:30.000Z",
        "window": {"start": "2024-06-03T08:10:30.000Z", "end": "2024-06-03T08:20:30.000Z"},
        "radars": ["RD-104", "RD-105"],
        "location": {"latitude": -23.561684, "longitude": -46.655981, "address": "Av. Paulista, 1578 - Bela Vista"},
        "totalDetections": 4,
        "detections": [
            {"timestamp": "2024-06-03T08:14:02.000Z", "plate": "FGH4I56", "radarId": "RD-104", "lane": "1", "speedKmh": 48, "occurrenceCount": 1},
            {"timestamp": "2024-06-03T08:15:30.000Z", "plate": "ABC1D23", "radarId": "RD-104", "lane": "2", "speedKmh": 52.5, "occurrenceCount": 1},
            {"timestamp": "2024-06-03T08:15:41.000Z", "plate": "JKL7M89", "radarId": "RD-105", "lane": "2", "speedKmh": 51, "occurrenceCount": 1},
            {"timestamp": "2024-06-03T08:19:10", "plate": "QRS0T12", "radarId": "RD-105", "lane": 3, "speedKmh": 63.2, "occurrenceCount": 1}
        ]
    }
]"#
}

/// Three passes; the last one has no co-occurring detections.
pub fn multi_group_json() -> &'static str {
    r#"[
    {
        "detectionTime": "2024-06-03T08:15:30.000Z",
        "window": {"start": "2024-06-03T08:10:30.000Z", "end": "2024-06-03T08:20:30.000Z"},
        "radars": ["RD-104"],
        "location": {"latitude": -23.561684, "longitude": -46.655981, "address": "Av. Paulista, 1578 - Bela Vista"},
        "totalDetections": 2,
        "detections": [
            {"timestamp": "2024-06-03T08:14:02.000Z", "plate": "FGH4I56", "radarId": "RD-104", "lane": "1", "speedKmh": 48, "occurrenceCount": 1},
            {"timestamp": "2024-06-03T08:15:30.000Z", "plate": "ABC1D23", "radarId": "RD-104", "lane": "2", "speedKmh": 52.5, "occurrenceCount": 1}
        ]
    },
    {
        "detectionTime": "2024-06-05T18:02:11.000Z",
        "window": {"start": "2024-06-05T17:57:11.000Z", "end": "2024-06-05T18:07:11.000Z"},
        "radars": ["RD-220", "RD-221"],
        "location": {"latitude": -23.5489, "longitude": -46.6388, "address": "Rua da Consolacao, 2200"},
        "totalDetections": 3,
        "detections": [
            {"timestamp": "2024-06-05T18:01:50.000Z", "plate": "FGH4I56", "radarId": "RD-220", "lane": "1", "speedKmh": 39, "occurrenceCount": 2},
            {"timestamp": "2024-06-05T18:02:11.000Z", "plate": "ABC1D23", "radarId": "RD-220", "lane": "1", "speedKmh": 41, "occurrenceCount": 2},
            {"timestamp": "2024-06-05T18:02:30.000Z", "plate": "JKL7M89", "radarId": "RD-221", "lane": "2", "speedKmh": 44, "occurrenceCount": 1}
        ]
    },
    {
        "detectionTime": "2024-06-07T06:40:00",
        "window": {"start": "2024-06-07T06:35:00", "end": "2024-06-07T06:45:00"},
        "radars": ["RD-310"],
        "location": {"latitude": -23.6, "longitude": -46.7, "address": "Marginal Pinheiros km 12"},
        "totalDetections": 0,
        "detections": []
    }
]"#
}

/// One pass with `rows` co-occurring detections, every tenth of them the
/// monitored plate. Enough rows spill the table over several pages.
pub fn long_table_json(rows: usize) -> String {
    let detections: Vec<String> = (0..rows)
        .map(|i| {
            let plate = if i % 10 == 0 {
                "ABC1D23".to_string()
            } else {
                format!("PLT{:04}", i)
            };
            format!(
                r#"{{"timestamp": "2024-06-03T08:{:02}:{:02}.000Z", "plate": "{}", "radarId": "RD-{}", "lane": "{}", "speedKmh": {}, "occurrenceCount": {}}}"#,
                (i / 60) % 60,
                i % 60,
                plate,
                100 + i % 3,
                1 + i % 4,
                40 + i % 30,
                1 + i / 10
            )
        })
        .collect();
    format!(
        r#"[{{
    "detectionTime": "2024-06-03T08:15:30.000Z",
    "window": {{"start": "2024-06-03T08:00:00.000Z", "end": "2024-06-03T09:00:00.000Z"}},
    "radars": ["RD-100", "RD-101", "RD-102"],
    "location": {{"latitude": -23.5, "longitude": -46.6, "address": "Rodovia dos Bandeirantes km 20"}},
    "totalDetections": {rows},
    "detections": [{}]
}}]"#,
        detections.join(",\n")
    )
}

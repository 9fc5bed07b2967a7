use crate::loader::RawTable;
use crate::record::{Columns, NormRecord, NormTable};
use chrono::{DateTime, NaiveDateTime};

/// Canonical name for a source column. Renames are exact; canonical names are
/// accepted as-is. Anything else is not part of the output schema and is
/// dropped here instead of surviving until the final column reorder.
fn canonical(name: &str) -> Option<&'static str> {
    match name {
        "user_id" | "user" => Some("user"),
        "ip_address" | "ip" => Some("ip"),
        "event_type" | "action" => Some("action"),
        "file_name" | "file" => Some("file"),
        "timestamp" => Some("timestamp"),
        "location" => Some("location"),
        "success" => Some("success"),
        "anomaly" => Some("anomaly"),
        _ => None,
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a raw timestamp, `None` on failure (the cleaner drops those rows).
/// Offset-carrying values keep their local wall clock; no zone conversion
/// happens anywhere in the pipeline.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Split a combined "City, Country" value. One part means city only; empty
/// input means both pieces are empty.
pub fn split_location(raw: &str) -> (String, String) {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [] | [""] => (String::new(), String::new()),
        [only] => (only.to_string(), String::new()),
        [first, .., last] => (first.to_string(), last.to_string()),
    }
}

/// Rename columns to canonical names, parse timestamps, split `location`.
pub fn normalize(raw: RawTable) -> NormTable {
    let mapping: Vec<Option<&'static str>> = raw.headers.iter().map(|h| canonical(h)).collect();
    let columns = Columns {
        location: mapping.contains(&Some("location")),
        success: mapping.contains(&Some("success")),
        anomaly: mapping.contains(&Some("anomaly")),
    };

    let rows = raw
        .rows
        .into_iter()
        .map(|fields| {
            let mut rec = NormRecord::default();
            for (i, field) in fields.into_iter().enumerate() {
                let Some(name) = mapping.get(i).copied().flatten() else {
                    continue;
                };
                match name {
                    "user" => rec.user = field,
                    "ip" => rec.ip = field,
                    "action" => rec.action = field,
                    "file" => rec.file = field,
                    "timestamp" => {
                        rec.timestamp = field.as_deref().and_then(parse_timestamp);
                    }
                    "location" => {
                        let (city, country) = split_location(field.as_deref().unwrap_or(""));
                        rec.city = Some(city);
                        rec.country = Some(country);
                    }
                    "success" => rec.success = field,
                    "anomaly" => rec.anomaly = field,
                    _ => {}
                }
            }
            rec
        })
        .collect();

    NormTable { columns, rows }
}

use chrono::NaiveDateTime;
use serde::Serialize;

/// Row as it leaves the normalizer: canonical field names, timestamp already
/// parsed (a value that failed to parse is `None`), everything still optional.
/// `success`/`anomaly` stay raw until the cleaner coerces them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormRecord {
    pub user: Option<String>,
    pub ip: Option<String>,
    pub action: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub file: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub success: Option<String>,
    pub anomaly: Option<String>,
}

/// Row after cleaning: required fields are plain values and `file` has the
/// fill policy applied. Enrichment fields are `None` until the enricher runs;
/// the writer collapses a missing lookup result to an empty string.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventRecord {
    pub user: String,
    pub ip: String,
    pub action: String,
    pub timestamp: NaiveDateTime,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub geo_city: Option<String>,
    pub geo_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<bool>,
    pub hour: Option<u32>,
    pub day_of_week: Option<u32>,
    pub date: Option<String>,
}

/// Which optional input columns were present. Optional columns only appear in
/// the output when the input carried them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Columns {
    pub location: bool,
    pub success: bool,
    pub anomaly: bool,
}

#[derive(Debug, Default)]
pub struct NormTable {
    pub columns: Columns,
    pub rows: Vec<NormRecord>,
}

#[derive(Debug, Default)]
pub struct EventTable {
    pub columns: Columns,
    pub rows: Vec<EventRecord>,
}

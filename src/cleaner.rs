use crate::record::{Columns, EventRecord, EventTable, NormRecord, NormTable};
use regex::Regex;
use std::sync::OnceLock;

fn ipv4_shape_re() -> &'static Regex {
    static IPV4_RE: OnceLock<Regex> = OnceLock::new();
    IPV4_RE.get_or_init(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("valid ipv4 regex"))
}

/// Syntactic IPv4 check: four dot-separated groups of 1-3 digits, each group
/// in 0..=255.
pub fn valid_ipv4(ip: &str) -> bool {
    if !ipv4_shape_re().is_match(ip) {
        return false;
    }
    ip.split('.')
        .all(|group| group.parse::<u16>().is_ok_and(|v| v <= 255))
}

/// Truthy conversion for loosely typed boolean columns: anything that is not
/// empty, "0" or "false" counts as true.
pub fn truthy(raw: &str) -> bool {
    let t = raw.trim();
    !(t.is_empty() || t == "0" || t.eq_ignore_ascii_case("false"))
}

/// Row counts around the cleaning stage, for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub before: usize,
    pub after: usize,
}

impl CleanReport {
    pub fn kept_pct(&self) -> f64 {
        if self.before == 0 {
            100.0
        } else {
            self.after as f64 / self.before as f64 * 100.0
        }
    }
}

/// Drop incomplete rows, validate IP syntax, apply the `file` fill policy and
/// coerce boolean columns. Row order is preserved.
pub fn clean(table: NormTable) -> (EventTable, CleanReport) {
    let before = table.rows.len();
    let columns = table.columns;
    let rows: Vec<EventRecord> = table
        .rows
        .into_iter()
        .filter_map(|rec| promote(rec, columns))
        .collect();
    let report = CleanReport {
        before,
        after: rows.len(),
    };
    (EventTable { columns, rows }, report)
}

// Required-field check runs before IP validation; both failures drop the row.
fn promote(rec: NormRecord, columns: Columns) -> Option<EventRecord> {
    let NormRecord {
        user,
        ip,
        action,
        timestamp,
        file,
        city,
        country,
        success,
        anomaly,
    } = rec;
    let user = user?;
    let timestamp = timestamp?;
    let ip = ip?;
    let action = action?;
    if !valid_ipv4(&ip) {
        return None;
    }

    // Fill policy: file_access with a missing file is "unknown", any other
    // missing file is "N/A", present values are untouched.
    let file = file.unwrap_or_else(|| {
        if action == "file_access" {
            "unknown".to_string()
        } else {
            "N/A".to_string()
        }
    });

    let success = columns
        .success
        .then(|| success.as_deref().is_some_and(truthy));
    let anomaly = columns
        .anomaly
        .then(|| anomaly.as_deref().is_some_and(truthy));

    Some(EventRecord {
        user,
        ip,
        action,
        timestamp,
        file,
        city,
        country,
        geo_city: None,
        geo_country: None,
        success,
        anomaly,
        hour: None,
        day_of_week: None,
        date: None,
    })
}

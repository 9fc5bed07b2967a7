use crate::geo::{GeoLookup, GeoResult};
use crate::record::{EventRecord, EventTable};
use chrono::{Datelike, Timelike};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Attach geolocation and derived time features to every row. One lookup per
/// row; a failed lookup leaves empty strings and never aborts the batch. Row
/// order is preserved in both execution modes.
pub fn enrich<G: GeoLookup + ?Sized>(mut table: EventTable, geo: &G) -> EventTable {
    #[cfg(feature = "parallel")]
    table
        .rows
        .par_iter_mut()
        .for_each(|rec| enrich_row(rec, geo));

    #[cfg(not(feature = "parallel"))]
    for rec in &mut table.rows {
        enrich_row(rec, geo);
    }

    table
}

fn enrich_row<G: GeoLookup + ?Sized>(rec: &mut EventRecord, geo: &G) {
    let (city, country) = match geo.lookup(&rec.ip) {
        GeoResult::Found { city, country } => (city, country),
        GeoResult::NotFound => (String::new(), String::new()),
    };
    rec.geo_city = Some(city);
    rec.geo_country = Some(country);
    rec.hour = Some(rec.timestamp.hour());
    // Monday = 0 .. Sunday = 6
    rec.day_of_week = Some(rec.timestamp.weekday().num_days_from_monday());
    rec.date = Some(rec.timestamp.format("%Y-%m-%d").to_string());
}

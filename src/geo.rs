use anyhow::{Context, Result};
use maxminddb::geoip2;
use memmap2::Mmap;
use std::net::IpAddr;
use std::path::Path;

/// Outcome of a single geolocation lookup. Reader internals never leak past
/// this boundary; every failure collapses to `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoResult {
    Found { city: String, country: String },
    NotFound,
}

/// IP to city/country lookup. Implementations must be infallible per call;
/// a lookup that cannot answer returns `NotFound`.
pub trait GeoLookup: Send + Sync {
    fn lookup(&self, ip: &str) -> GeoResult;
}

/// GeoLite2 City database, mmap-backed. Opened once per run; an unreadable
/// database aborts the run before any output is written.
pub struct MaxMindLookup {
    reader: maxminddb::Reader<Mmap>,
}

impl MaxMindLookup {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = maxminddb::Reader::open_mmap(path)
            .with_context(|| format!("cannot open geolocation database {}", path.display()))?;
        Ok(Self { reader })
    }
}

impl GeoLookup for MaxMindLookup {
    fn lookup(&self, ip: &str) -> GeoResult {
        let Ok(addr) = ip.parse::<IpAddr>() else {
            return GeoResult::NotFound;
        };
        let rec: geoip2::City = match self.reader.lookup(addr) {
            Ok(rec) => rec,
            Err(_) => return GeoResult::NotFound,
        };
        GeoResult::Found {
            city: english_name(rec.city.as_ref().and_then(|c| c.names.as_ref())),
            country: english_name(rec.country.as_ref().and_then(|c| c.names.as_ref())),
        }
    }
}

fn english_name(names: Option<&std::collections::BTreeMap<&str, &str>>) -> String {
    names
        .and_then(|n| n.get("en").copied())
        .unwrap_or_default()
        .to_string()
}

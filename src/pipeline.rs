use crate::cleaner::{self, CleanReport};
use crate::config::Config;
use crate::enricher;
use crate::geo::{GeoLookup, MaxMindLookup};
use crate::loader;
use crate::normalizer;
use crate::output;
use crate::record::{EventTable, NormTable};
use anyhow::Result;

#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub report: CleanReport,
    pub written: usize,
}

/// Full run against the configured GeoLite2 database. The reader is scoped
/// to the enrichment stage and released before anything is written.
pub fn run(config: &Config) -> Result<RunSummary> {
    let (cleaned, report) = load_and_clean(config)?;
    let enriched = {
        let geo = MaxMindLookup::open(&config.geodb)?;
        enrich(cleaned, &geo)
    };
    write_out(&enriched, config, report)
}

/// Same pipeline with a caller-supplied lookup; tests drive this with a stub.
pub fn run_with<G: GeoLookup + ?Sized>(config: &Config, geo: &G) -> Result<RunSummary> {
    let (cleaned, report) = load_and_clean(config)?;
    let enriched = enrich(cleaned, geo);
    write_out(&enriched, config, report)
}

fn load_and_clean(config: &Config) -> Result<(EventTable, CleanReport)> {
    eprintln!("Loading raw data from {}", config.input.display());
    let raw = loader::load(&config.input)?;
    let normalized: NormTable = normalizer::normalize(raw);
    Ok(cleaner::clean(normalized))
}

fn enrich<G: GeoLookup + ?Sized>(table: EventTable, geo: &G) -> EventTable {
    eprintln!("Enriching data with geolocation from IP addresses...");
    enricher::enrich(table, geo)
}

fn write_out(table: &EventTable, config: &Config, report: CleanReport) -> Result<RunSummary> {
    let mut writer = output::create_writer(&config.output)?;
    writer.write_table(table)?;
    writer.finish()?;

    eprintln!(
        "Rows before: {} | after: {} | kept: {:.2}%",
        report.before,
        report.after,
        report.kept_pct()
    );
    eprintln!("Saved cleaned data to: {}", config.output);

    Ok(RunSummary {
        report,
        written: table.rows.len(),
    })
}

use std::path::PathBuf;

/// Everything the pipeline needs to know about its surroundings. Built from
/// CLI args in main; tests construct it directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw event log (delimited text with a header row).
    pub input: PathBuf,
    /// Writer target: "stdout" or a file path whose extension picks the format.
    pub output: String,
    /// GeoLite2 City database used for IP enrichment.
    pub geodb: PathBuf,
}

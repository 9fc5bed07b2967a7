use crate::record::{Columns, EventRecord, EventTable};
use anyhow::{Result, anyhow};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Preferred output column order. Optional columns are filtered out when the
/// input never carried them.
const PREFERRED_ORDER: &[&str] = &[
    "user",
    "ip",
    "action",
    "timestamp",
    "date",
    "hour",
    "day_of_week",
    "file",
    "city",
    "country",
    "geo_city",
    "geo_country",
    "success",
    "anomaly",
];

fn active_columns(columns: Columns) -> Vec<&'static str> {
    PREFERRED_ORDER
        .iter()
        .copied()
        .filter(|name| match *name {
            "city" | "country" => columns.location,
            "success" => columns.success,
            "anomaly" => columns.anomaly,
            _ => true,
        })
        .collect()
}

// Missing enrichment values collapse to empty strings here and nowhere else.
fn field_value(rec: &EventRecord, name: &str) -> String {
    match name {
        "user" => rec.user.clone(),
        "ip" => rec.ip.clone(),
        "action" => rec.action.clone(),
        "timestamp" => rec.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        "date" => rec.date.clone().unwrap_or_default(),
        "hour" => rec.hour.map(|h| h.to_string()).unwrap_or_default(),
        "day_of_week" => rec.day_of_week.map(|d| d.to_string()).unwrap_or_default(),
        "file" => rec.file.clone(),
        "city" => rec.city.clone().unwrap_or_default(),
        "country" => rec.country.clone().unwrap_or_default(),
        "geo_city" => rec.geo_city.clone().unwrap_or_default(),
        "geo_country" => rec.geo_country.clone().unwrap_or_default(),
        "success" => rec.success.map(|b| b.to_string()).unwrap_or_default(),
        "anomaly" => rec.anomaly.map(|b| b.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

pub enum Writer {
    Stdout(Box<dyn Write>),
    CsvFile(BufWriter<File>),
    TsvFile(BufWriter<File>),
    JsonlFile(BufWriter<File>),
}

impl Writer {
    pub fn write_table(&mut self, table: &EventTable) -> Result<()> {
        let cols = active_columns(table.columns);
        match self {
            Writer::Stdout(writer) => {
                for rec in &table.rows {
                    writeln!(writer, "{rec:#?}")?;
                }
            }
            Writer::CsvFile(writer) => {
                writeln!(writer, "{}", cols.join(","))?;
                for rec in &table.rows {
                    let fields: Vec<String> = cols
                        .iter()
                        .map(|c| escape_csv_field(&field_value(rec, c)))
                        .collect();
                    writeln!(writer, "{}", fields.join(","))?;
                }
            }
            Writer::TsvFile(writer) => {
                writeln!(writer, "{}", cols.join("\t"))?;
                for rec in &table.rows {
                    let fields: Vec<String> = cols
                        .iter()
                        .map(|c| escape_tsv_field(&field_value(rec, c)))
                        .collect();
                    writeln!(writer, "{}", fields.join("\t"))?;
                }
            }
            Writer::JsonlFile(writer) => {
                for rec in &table.rows {
                    let serialized = serde_json::to_string(rec)?;
                    writeln!(writer, "{}", serialized)?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        match self {
            Writer::Stdout(ref mut writer) => writer.flush()?,
            Writer::CsvFile(ref mut writer)
            | Writer::TsvFile(ref mut writer)
            | Writer::JsonlFile(ref mut writer) => writer.flush()?,
        }
        Ok(())
    }
}

pub fn create_writer(output_arg: &str) -> Result<Writer> {
    match output_arg {
        "stdout" => Ok(Writer::Stdout(Box::new(io::stdout()))),
        path if path.ends_with(".csv") => {
            create_parent_dirs(path)?;
            let file = File::create(path)?;
            Ok(Writer::CsvFile(BufWriter::new(file)))
        }
        path if path.ends_with(".tsv") => {
            create_parent_dirs(path)?;
            let file = File::create(path)?;
            Ok(Writer::TsvFile(BufWriter::new(file)))
        }
        path if path.ends_with(".jsonl") || path.ends_with(".ndjson") => {
            create_parent_dirs(path)?;
            let file = File::create(path)?;
            Ok(Writer::JsonlFile(BufWriter::new(file)))
        }
        path => {
            // Default to CSV if it looks like a path
            if path.contains('/') || path.contains('\\') || path.contains('.') {
                create_parent_dirs(path)?;
                let file = File::create(path)?;
                Ok(Writer::CsvFile(BufWriter::new(file)))
            } else {
                Err(anyhow!(
                    "Unknown output format: {}. Use 'stdout' or a .csv/.tsv/.jsonl path",
                    output_arg
                ))
            }
        }
    }
}

fn create_parent_dirs(file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn escape_tsv_field(field: &str) -> String {
    field
        .replace('\t', " ")
        .replace('\n', " ")
        .replace('\r', " ")
}

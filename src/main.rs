use anyhow::Result;
use clap::Parser;
use logprep::config::Config;
use logprep::pipeline::{self, RunSummary};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw event log (CSV with a header row)
    #[arg(value_name = "FILE")]
    file: String,

    #[arg(short, long, default_value = "stdout")]
    output: String,

    /// GeoLite2 City database used for IP enrichment
    #[arg(long, value_name = "MMDB")]
    geodb: String,

    #[arg(long)]
    benchmark: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let start_time = Instant::now();
    let file_size = std::fs::metadata(&args.file)?.len();

    let config = Config {
        input: args.file.into(),
        output: args.output,
        geodb: args.geodb.into(),
    };
    let summary = pipeline::run(&config)?;

    if args.benchmark {
        print_benchmark_results(file_size, &summary, start_time.elapsed());
    }

    Ok(())
}

fn print_benchmark_results(file_size: u64, summary: &RunSummary, duration: std::time::Duration) {
    let duration_secs = duration.as_secs_f64();
    let file_size_mb = file_size as f64 / (1024.0 * 1024.0);
    let throughput_mbs = file_size_mb / duration_secs;
    let throughput_rows = summary.report.before as f64 / duration_secs;

    eprintln!("\n=== BENCHMARK RESULTS ===");
    eprintln!("File size: {:.2} MB", file_size_mb);
    eprintln!("Rows in: {}", summary.report.before);
    eprintln!("Rows out: {}", summary.written);
    eprintln!("Processing time: {:.3}s", duration_secs);
    eprintln!("Throughput: {:.2} MB/s", throughput_mbs);
    eprintln!("Throughput: {:.0} rows/s", throughput_rows);
    eprintln!("Kept rate: {:.1}%", summary.report.kept_pct());
}

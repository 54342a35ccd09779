//! Batch processing command for multiple report files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, error, warn};

use blotter_core::models::record::Record;
use blotter_core::report::IncidentParser;

use super::process::{format_records, parse_file, LayoutArgs, OutputFormat, StoreArgs};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(flatten)]
    store: StoreArgs,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    records: Option<Vec<Record>>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let parser = IncidentParser::new().with_layout(args.layout.apply(config.layout.clone()));

    // Documents are independent; pages of one document stay in one worker
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.max(1))
        .build()?;

    let results: Vec<ProcessResult> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let file_start = Instant::now();
                let result = parse_file(path, &parser);
                let processing_time_ms = file_start.elapsed().as_millis() as u64;
                overall_pb.inc(1);

                match result {
                    Ok(extraction) => ProcessResult {
                        path: path.clone(),
                        records: Some(extraction.records),
                        error: None,
                        processing_time_ms,
                    },
                    Err(e) => ProcessResult {
                        path: path.clone(),
                        records: None,
                        error: Some(e.to_string()),
                        processing_time_ms,
                    },
                }
            })
            .collect()
    });

    overall_pb.finish_and_clear();

    for result in &results {
        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), error_msg);
            }
        }
    }

    let successful: Vec<_> = results.iter().filter(|r| r.records.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        let paths: Vec<&Path> = successful.iter().map(|r| r.path.as_path()).collect();
        for (result, name) in successful.iter().zip(output_names(&paths)) {
            if let Some(records) = &result.records {
                let output_path = output_dir.join(format!("{}.{}", name, args.format.extension()));
                fs::write(&output_path, format_records(records, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    // Store every successful file's records in one database
    if let Some(db_path) = args.store.target(&config) {
        let mut store = args.store.open(&db_path)?;
        let mut inserted = 0;
        for records in successful.iter().filter_map(|r| r.records.as_ref()) {
            inserted += store.populate(records)?;
        }
        eprintln!(
            "{} Stored {} incidents in {}",
            style("✓").green(),
            inserted,
            db_path.display()
        );
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output file name (without extension) for each input.
///
/// Inputs sharing a stem, such as `a.pdf` and `a.txt`, keep their own
/// extension in the name so neither output overwrites the other.
fn output_names(paths: &[&Path]) -> Vec<String> {
    let stem = |path: &Path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report")
            .to_string()
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for path in paths {
        *counts.entry(stem(path)).or_default() += 1;
    }

    paths
        .iter()
        .map(|path| {
            let name = stem(path);
            if counts[&name] > 1 {
                warn!("Several inputs share the name {}; keeping extensions in output names", name);
                path.file_name()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .unwrap_or(name)
            } else {
                name
            }
        })
        .collect()
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let generated_at = Utc::now().to_rfc3339();

    wtr.write_record([
        "filename",
        "status",
        "records",
        "first_incident",
        "last_incident",
        "processing_time_ms",
        "generated_at",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(records) = &result.records {
            let first = records.first().map(|r| r.case_number.as_str()).unwrap_or("");
            let last = records.last().map(|r| r.case_number.as_str()).unwrap_or("");
            wtr.write_record([
                filename,
                "success",
                &records.len().to_string(),
                first,
                last,
                &result.processing_time_ms.to_string(),
                &generated_at,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                &generated_at,
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_unique_stems() {
        let paths = [Path::new("reports/a.txt"), Path::new("reports/b.pdf")];
        assert_eq!(output_names(&paths), vec!["a", "b"]);
    }

    #[test]
    fn test_output_names_shared_stem_keeps_extension() {
        let paths = [
            Path::new("reports/a.pdf"),
            Path::new("reports/a.txt"),
            Path::new("reports/b.txt"),
        ];
        assert_eq!(output_names(&paths), vec!["a.pdf", "a.txt", "b"]);
    }
}

//! Process command - parse a single incident report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use blotter_core::models::config::{BlotterConfig, LayoutConfig};
use blotter_core::models::record::{Record, INCIDENT_COLUMNS};
use blotter_core::report::{ExtractionResult, IncidentParser};
use blotter_core::source::source_for_extension;
use blotter_core::store::IncidentStore;

use super::fetch::{build_client, download_file, is_url};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input report: a PDF, a form-feed separated text file, or an http(s) URL
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(flatten)]
    store: StoreArgs,

    /// Print incident counts per nature after storing
    #[arg(long)]
    status: bool,

    /// Show parse statistics
    #[arg(long)]
    show_stats: bool,
}

/// Layout overrides shared by process and batch.
#[derive(Args, Clone, Default)]
pub struct LayoutArgs {
    /// Header lines to drop from the first page
    #[arg(long)]
    header_lines: Option<usize>,

    /// Footer lines to drop from the last page
    #[arg(long)]
    footer_lines: Option<usize>,

    /// Also drop the footer of single-page reports
    #[arg(long)]
    trim_single_page_footer: bool,

    /// Drop whitespace-only lines before trimming (PDF text has vertical spacing)
    #[arg(long)]
    skip_blank_lines: bool,

    /// Accept rows with trailing whitespace after the agency code
    #[arg(long)]
    tolerate_trailing_whitespace: bool,
}

impl LayoutArgs {
    pub fn apply(&self, mut layout: LayoutConfig) -> LayoutConfig {
        if let Some(lines) = self.header_lines {
            layout.header_lines = lines;
        }
        if let Some(lines) = self.footer_lines {
            layout.footer_lines = lines;
        }
        if self.trim_single_page_footer {
            layout.trim_single_page_footer = true;
        }
        if self.skip_blank_lines {
            layout.skip_blank_lines = true;
        }
        if self.tolerate_trailing_whitespace {
            layout.tolerate_trailing_whitespace = true;
        }
        layout
    }
}

/// Database options shared by process and batch.
#[derive(Args, Clone, Default)]
pub struct StoreArgs {
    /// Store records in the configured database
    #[arg(long)]
    store: bool,

    /// Store records in this database (implies --store)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep existing rows instead of recreating the database
    #[arg(long)]
    append: bool,
}

impl StoreArgs {
    /// Database to write to, if storing was requested.
    pub fn target(&self, config: &BlotterConfig) -> Option<PathBuf> {
        match (&self.db, self.store) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(config.store.database.clone()),
            (None, false) => None,
        }
    }

    /// Open the target database, fresh unless `--append` was given.
    pub fn open(&self, path: &Path) -> anyhow::Result<IncidentStore> {
        let store = if self.append {
            IncidentStore::open(path)?
        } else {
            IncidentStore::create(path)?
        };
        Ok(store)
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output with the incidents table columns
    Csv,
    /// Pipe-separated text, one incident per line
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;
    let db_target = args.store.target(&config);

    if args.status && db_target.is_none() {
        anyhow::bail!("--status needs --store or --db");
    }

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let input = if is_url(&args.input) {
        pb.set_message("Downloading report...");
        pb.set_position(5);
        let path = config.download_path();
        let client = build_client(&config.fetch)?;
        download_file(&client, &args.input, &path, &pb).await?;
        pb.set_length(100);
        path
    } else {
        let path = PathBuf::from(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        path
    };

    info!("Processing report: {}", input.display());

    pb.set_message("Extracting pages...");
    pb.set_position(20);

    let parser = IncidentParser::new().with_layout(args.layout.apply(config.layout.clone()));
    let result = parse_file(&input, &parser)?;

    pb.set_message("Parsed records");
    pb.set_position(70);

    if let Some(db_path) = db_target {
        pb.set_message("Storing records...");
        let mut store = args.store.open(&db_path)?;
        let inserted = store.populate(&result.records)?;
        pb.finish_and_clear();

        eprintln!(
            "{} Stored {} incidents in {}",
            style("✓").green(),
            inserted,
            db_path.display()
        );

        if args.status {
            for row in store.nature_counts()? {
                println!("{}|{}", row.nature, row.count);
            }
        }
    } else {
        pb.finish_and_clear();
    }

    if !args.status || args.output.is_some() {
        let output = format_records(&result.records, args.format)?;

        if let Some(output_path) = &args.output {
            fs::write(output_path, &output)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                output_path.display()
            );
        } else {
            print!("{}", output);
        }
    }

    if args.show_stats {
        print_stats(&result);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load a report file with the source matching its extension and parse it.
pub fn parse_file(path: &Path, parser: &IncidentParser) -> anyhow::Result<ExtractionResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let data = fs::read(path)?;
    let mut source = source_for_extension(extension);
    source.load(&data)?;
    debug!("{} has {} pages", path.display(), source.page_count());

    Ok(parser.parse_source(source.as_ref())?)
}

fn print_stats(result: &ExtractionResult) {
    eprintln!();
    eprintln!("{} Records: {}", style("ℹ").blue(), result.records.len());
    eprintln!("{} Pages: {}", style("ℹ").blue(), result.pages);
    eprintln!(
        "{} Lines trimmed: {}, blank: {}, continuations: {}",
        style("ℹ").blue(),
        result.lines_trimmed,
        result.blank_lines_skipped,
        result.continuations
    );
    eprintln!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        result.processing_time_ms
    );
}

pub fn format_records(records: &[Record], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[Record]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(INCIDENT_COLUMNS)?;
    for record in records {
        wtr.write_record(record.as_row())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[Record]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&record.as_row().join("|"));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            date_time: "8/1/2024 / 1:19".to_string(),
            case_number: "2024-00055436".to_string(),
            address: "123 MAIN ST, APT 4B".to_string(),
            category: "TRAFFIC STOP".to_string(),
            agency_code: "OK0140200".to_string(),
        }
    }

    #[test]
    fn test_format_csv_quotes_commas() {
        let csv = format_records(&[record()], OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("incident_time,incident_number,incident_location,nature,incident_ori")
        );
        assert_eq!(
            lines.next(),
            Some("8/1/2024 / 1:19,2024-00055436,\"123 MAIN ST, APT 4B\",TRAFFIC STOP,OK0140200")
        );
    }

    #[test]
    fn test_format_text() {
        let text = format_records(&[record()], OutputFormat::Text).unwrap();
        assert_eq!(
            text,
            "8/1/2024 / 1:19|2024-00055436|123 MAIN ST, APT 4B|TRAFFIC STOP|OK0140200\n"
        );
    }

    #[test]
    fn test_layout_args_override() {
        let args = LayoutArgs {
            header_lines: Some(5),
            footer_lines: None,
            trim_single_page_footer: true,
            skip_blank_lines: true,
            ..LayoutArgs::default()
        };
        let layout = args.apply(LayoutConfig::default());

        assert_eq!(layout.header_lines, 5);
        assert_eq!(layout.footer_lines, 1);
        assert!(layout.trim_single_page_footer);
        assert!(layout.skip_blank_lines);
        assert!(!layout.tolerate_trailing_whitespace);
    }

    #[test]
    fn test_store_target() {
        let config = BlotterConfig::default();

        assert_eq!(StoreArgs::default().target(&config), None);

        let store = StoreArgs { store: true, ..StoreArgs::default() };
        assert_eq!(store.target(&config), Some(config.store.database.clone()));

        let db = StoreArgs { db: Some(PathBuf::from("x.db")), ..StoreArgs::default() };
        assert_eq!(db.target(&config), Some(PathBuf::from("x.db")));
    }
}

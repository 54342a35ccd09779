//! Fetch command - download the published incident report.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use blotter_core::models::config::FetchConfig;

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Report URL (default: fetch.url from the config)
    url: Option<String>,

    /// Output file (default: <download_dir>/DailyIncidentSummary.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: FetchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let url = match args.url.or_else(|| config.fetch.url.clone()) {
        Some(url) => url,
        None => anyhow::bail!(
            "No report URL given. Pass one as an argument or run 'blotter config set fetch.url <URL>'."
        ),
    };
    let output = args.output.unwrap_or_else(|| config.download_path());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.green} {msg:<30} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message("Downloading report");

    let client = build_client(&config.fetch)?;
    let bytes = download_file(&client, &url, &output, &pb).await?;
    pb.finish_and_clear();

    println!(
        "{} Downloaded {} bytes to {}",
        style("✓").green(),
        bytes,
        output.display()
    );

    Ok(())
}

/// HTTP client that presents the configured browser User-Agent.
pub fn build_client(config: &FetchConfig) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Stream `url` to `path`, returning the number of bytes written.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<u64> {
    info!("Fetching report from {}", url);
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {} fetching {}", response.status(), url);
    }

    // Get content length if available
    if let Some(content_length) = response.content_length() {
        pb.set_length(content_length);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Create temp file first
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;

    // Stream download with progress
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    drop(file);

    // Rename temp to final
    fs::rename(&temp_path, path)?;
    debug!("Wrote {} bytes to {}", downloaded, path.display());

    Ok(downloaded)
}

/// Whether a process/batch input names a remote report.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://www.normanok.gov/sites/default/files/documents/summary.pdf"));
        assert!(is_url("http://localhost/report.pdf"));
        assert!(!is_url("resources/DailyIncidentSummary.pdf"));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&FetchConfig::default()).is_ok());
    }
}

//! Configuration structures for the ingestion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the blotter pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlotterConfig {
    /// Report layout (header/footer trimming).
    pub layout: LayoutConfig,

    /// Report download settings.
    pub fetch: FetchConfig,

    /// Database settings.
    pub store: StoreConfig,
}

/// Report layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Lines dropped from the top of the first page (title and column headers).
    pub header_lines: usize,

    /// Lines dropped from the bottom of the last page.
    pub footer_lines: usize,

    /// Also drop the footer when the report has a single page.
    pub trim_single_page_footer: bool,

    /// Drop whitespace-only lines before trimming instead of treating them
    /// as continuations. Useful for PDF text, which carries vertical spacing.
    pub skip_blank_lines: bool,

    /// Accept rows whose agency code is followed by trailing whitespace.
    pub tolerate_trailing_whitespace: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_lines: 3,
            footer_lines: 1,
            trim_single_page_footer: false,
            skip_blank_lines: false,
            tolerate_trailing_whitespace: false,
        }
    }
}

/// Report download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// URL of the published report, used when no URL is given on the command line.
    pub url: Option<String>,

    /// User-Agent header; the publishing site rejects non-browser agents.
    pub user_agent: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Directory downloaded reports are written to.
    pub download_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: None,
            user_agent: "Mozilla/5.0 (X11; Linux i686) AppleWebKit/537.17 (KHTML, like Gecko) Chrome/24.0.1312.27 Safari/537.17".to_string(),
            timeout_secs: 60,
            download_dir: PathBuf::from("resources"),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("resources").join("normanpd.db"),
        }
    }
}

impl BlotterConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Path a downloaded report is saved under.
    pub fn download_path(&self) -> PathBuf {
        self.fetch.download_dir.join("DailyIncidentSummary.pdf")
    }
}

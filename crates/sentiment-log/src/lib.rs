//! Append-only CSV log of daily bullish/bearish results.
//!
//! One row per run: date, comma-joined bullish tickers, comma-joined bearish
//! tickers. Rows are never updated or deduplicated, so the same date can
//! appear more than once. There is no locking; concurrent runs may interleave.

use analysis_core::{AnalysisError, SentimentLogRow};
use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_PATH: &str = "sentiment_log.csv";
pub const LOG_HEADER: [&str; 3] = ["Date", "Top 3 Bullish", "Top 3 Bearish"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const LIST_SEPARATOR: &str = ", ";

fn csv_error(e: csv::Error) -> AnalysisError {
    AnalysisError::LogError(e.to_string())
}

/// Join tickers for a log field; an empty list is an empty field.
pub fn format_ticker_list(tickers: &[String]) -> String {
    tickers.join(LIST_SEPARATOR)
}

/// Inverse of [`format_ticker_list`].
pub fn parse_ticker_list(field: &str) -> Vec<String> {
    field
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct SentimentLog {
    path: PathBuf,
}

impl Default for SentimentLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl SentimentLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append today's (local calendar date) result and return the written row.
    pub fn append(&self, bullish: &[String], bearish: &[String]) -> Result<SentimentLogRow, AnalysisError> {
        let row = SentimentLogRow {
            date: Local::now().date_naive(),
            top_bullish: bullish.to_vec(),
            top_bearish: bearish.to_vec(),
        };
        self.append_row(&row)?;
        Ok(row)
    }

    /// Append a row, creating the file with its header when absent or empty.
    pub fn append_row(&self, row: &SentimentLogRow) -> Result<(), AnalysisError> {
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if needs_header {
            writer.write_record(LOG_HEADER).map_err(csv_error)?;
        }
        writer
            .write_record([
                row.date.format(DATE_FORMAT).to_string(),
                format_ticker_list(&row.top_bullish),
                format_ticker_list(&row.top_bearish),
            ])
            .map_err(csv_error)?;
        writer.flush()?;

        tracing::info!("Results saved to {}", self.path.display());
        Ok(())
    }

    /// Read every row back in file order. A missing log reads as empty; rows
    /// with an unparseable date are skipped.
    pub fn read_rows(&self) -> Result<Vec<SentimentLogRow>, AnalysisError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(csv_error)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            let date_field = record.get(0).unwrap_or("").trim();
            let date = match NaiveDate::parse_from_str(date_field, DATE_FORMAT) {
                Ok(date) => date,
                Err(e) => {
                    tracing::warn!("Skipping log row with bad date {:?}: {}", date_field, e);
                    continue;
                }
            };

            rows.push(SentimentLogRow {
                date,
                top_bullish: parse_ticker_list(record.get(1).unwrap_or("")),
                top_bearish: parse_ticker_list(record.get(2).unwrap_or("")),
            });
        }
        Ok(rows)
    }

    /// Most recently appended row, if any.
    pub fn latest(&self) -> Result<Option<SentimentLogRow>, AnalysisError> {
        Ok(self.read_rows()?.pop())
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A subreddit post as returned by the post-fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Title and body joined the way the pipeline analyzes them.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// Averaged compound sentiment per validated ticker, each value in [-1, 1].
pub type TickerSentiment = HashMap<String, f64>;

/// Market-data record used to decide whether a candidate is a tradable equity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub instrument_type: Option<String>,
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Name, price, valuation and one year of daily history for a single ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDetails {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub history: Vec<Bar>,
}

impl StockDetails {
    /// Percent change from the first to the last close in `history`.
    pub fn period_change_percent(&self) -> Option<f64> {
        let first = self.history.first()?.close;
        let last = self.history.last()?.close;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }

    /// Highest high and lowest low over `history`.
    pub fn period_range(&self) -> Option<(f64, f64)> {
        if self.history.is_empty() {
            return None;
        }
        let high = self.history.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let low = self.history.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        Some((high, low))
    }
}

/// One row of the append-only sentiment log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentLogRow {
    pub date: NaiveDate,
    pub top_bullish: Vec<String>,
    pub top_bearish: Vec<String>,
}

/// Named pipeline checkpoint reported to the progress observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStep {
    FetchingPosts,
    ProcessingPosts,
    ProcessingTickers,
    AnalyzingSentiment,
    SavingResults,
    Complete,
}

/// Progress notification: step name, human-readable message, percentage 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: ProgressStep,
    pub message: String,
    pub progress: f64,
}

impl ProgressEvent {
    pub fn new(step: ProgressStep, message: impl Into<String>, progress: f64) -> Self {
        Self {
            step,
            message: message.into(),
            progress: progress.clamp(0.0, 100.0),
        }
    }
}

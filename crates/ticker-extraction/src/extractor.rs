use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Uppercase tokens that look like tickers but almost never are.
pub const STOPWORDS: &[&str] = &[
    // Common English words
    "I", "A", "THE", "IN", "ON", "AT", "TO", "FOR", "AND", "OR",
    "BUT", "SO", "PM", "AM", "CEO", "CFO", "CTO", "USA", "UK", "TEAM",
    "TALK", "NEW", "LOT", "EDIT",
    // Financial/market terms
    "IPO", "ETF", "MACD", "RSI", "EPS", "P2P", "ROI", "ROE", "ROA",
    "EBIT", "CAGR", "WACC", "GAAP", "NYSE", "DJIA", "NASDAQ", "DOW",
    "REIT", "DRIP", "FIFO", "LIFO", "FDIC", "RICO", "FANG", "SPAC",
    // Technical terms
    "API", "AI", "ML", "CPU", "GPU", "RAM", "SSD", "HDD", "PC", "APP",
    "WWW",
    // Units and others
    "USD", "EUR", "GBP", "YTD", "TTM", "QOQ", "YOY", "FY",
    "Q1", "Q2", "Q3", "Q4", "FED", "SEC", "IMF", "GDP",
];

const MIN_TICKER_LEN: usize = 2;
const MAX_TICKER_LEN: usize = 5;

/// Maximal ASCII-alphanumeric runs. A run made of 2-5 uppercase letters is a
/// ticker bounded on both sides by non-alphanumerics.
static TOKEN_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+").ok());

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Pulls ticker-shaped tokens out of free text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickerExtractor;

impl TickerExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the distinct ticker candidates in `text`, stopwords removed.
    ///
    /// Fail-open: if the token pattern is unavailable the result is empty
    /// rather than an error.
    pub fn extract_candidates(&self, text: &str) -> HashSet<String> {
        let Some(pattern) = TOKEN_PATTERN.as_ref() else {
            tracing::error!("Ticker pattern failed to compile; no candidates extracted");
            return HashSet::new();
        };

        pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| is_ticker_shaped(token))
            .filter(|token| !is_stopword(token))
            .map(str::to_string)
            .collect()
    }
}

fn is_ticker_shaped(token: &str) -> bool {
    (MIN_TICKER_LEN..=MAX_TICKER_LEN).contains(&token.len())
        && token.bytes().all(|b| b.is_ascii_uppercase())
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

use analysis_core::{AnalysisError, Bar, QuoteRecord, StockDetails, TickerLookup};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
// Yahoo rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) reddit-sentiment/0.1";

/// Client for the Yahoo Finance chart and quote endpoints.
///
/// The chart `meta` block carries instrument type, reported symbol and current
/// price (ticker validation), and its indicator series carry daily bars. The
/// quote endpoint adds market cap and P/E for stock details.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch the chart for `symbol`. Returns `Ok(None)` when Yahoo has no data
    /// for the symbol (404 or an empty result set).
    async fn get_chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<Option<ChartResult>, AnalysisError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Yahoo has no chart for {}", symbol);
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let chart_response: ChartResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(chart_response.into_first_result())
    }

    /// Fetch market cap and P/E from the quote endpoint.
    async fn get_valuation(&self, symbol: &str) -> Result<Option<QuoteSummary>, AnalysisError> {
        let url = format!("{}/v7/finance/quote", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("symbols", symbol)])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let quote_response: QuoteResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(quote_response.into_summary(symbol))
    }

    /// Get the quote record used for ticker validation.
    pub async fn get_quote(&self, symbol: &str) -> Result<Option<QuoteRecord>, AnalysisError> {
        let chart = self.get_chart(symbol, "1d", "1d").await?;
        Ok(chart.map(|c| c.meta.into_quote_record()))
    }

    /// Get name, current price, valuation and one year of daily bars for a
    /// symbol. Market cap and P/E are left empty when the quote endpoint fails.
    pub async fn get_stock_details(&self, symbol: &str) -> Result<StockDetails, AnalysisError> {
        let chart = self
            .get_chart(symbol, "1y", "1d")
            .await?
            .ok_or_else(|| AnalysisError::InvalidData(format!("No data found for {}", symbol)))?;

        let mut details = chart.into_stock_details(symbol);
        match self.get_valuation(symbol).await {
            Ok(Some(summary)) => summary.apply_to(&mut details),
            Ok(None) => tracing::debug!("No quote summary for {}", symbol),
            Err(e) => tracing::warn!("Could not fetch valuation for {}: {}", symbol, e),
        }
        Ok(details)
    }
}

#[async_trait]
impl TickerLookup for YahooClient {
    async fn lookup(&self, symbol: &str) -> Result<Option<QuoteRecord>, AnalysisError> {
        self.get_quote(symbol).await
    }
}

// Response structures
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

impl ChartResponse {
    fn into_first_result(self) -> Option<ChartResult> {
        if let Some(err) = &self.chart.error {
            tracing::debug!(
                "Yahoo chart error {}: {}",
                err.code,
                err.description.as_deref().unwrap_or("")
            );
        }
        self.chart.result.and_then(|results| results.into_iter().next())
    }
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

impl ChartResult {
    fn bars(&self) -> Vec<Bar> {
        let Some(series) = self.indicators.as_ref().and_then(|i| i.quote.first()) else {
            return Vec::new();
        };

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let value = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
                Some(Bar {
                    timestamp: DateTime::from_timestamp(ts, 0)?,
                    open: value(&series.open)?,
                    high: value(&series.high)?,
                    low: value(&series.low)?,
                    close: value(&series.close)?,
                    volume: value(&series.volume).unwrap_or(0.0),
                })
            })
            .collect()
    }

    fn into_stock_details(self, symbol: &str) -> StockDetails {
        let history = self.bars();
        let meta = self.meta;
        StockDetails {
            symbol: meta.symbol.clone().unwrap_or_else(|| symbol.to_string()),
            name: meta
                .long_name
                .clone()
                .or_else(|| meta.short_name.clone())
                .unwrap_or_else(|| symbol.to_string()),
            price: meta.regular_market_price.unwrap_or(0.0),
            currency: meta.currency,
            market_cap: None,
            pe_ratio: None,
            history,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    instrument_type: Option<String>,
    regular_market_price: Option<f64>,
    long_name: Option<String>,
    short_name: Option<String>,
    currency: Option<String>,
}

impl ChartMeta {
    fn into_quote_record(self) -> QuoteRecord {
        QuoteRecord {
            instrument_type: self.instrument_type,
            symbol: self.symbol,
            regular_market_price: self.regular_market_price,
            long_name: self.long_name.or(self.short_name),
            currency: self.currency,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponseBody,
}

impl QuoteResponse {
    fn into_summary(self, symbol: &str) -> Option<QuoteSummary> {
        self.quote_response
            .result
            .into_iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponseBody {
    #[serde(default)]
    result: Vec<QuoteSummary>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    symbol: String,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
}

impl QuoteSummary {
    /// Forward P/E when available, trailing otherwise.
    fn apply_to(self, details: &mut StockDetails) {
        details.market_cap = self.market_cap;
        details.pe_ratio = self.forward_pe.or(self.trailing_pe);
    }
}

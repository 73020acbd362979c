use crate::extractor::TickerExtractor;
use analysis_core::{QuoteRecord, TickerLookup};
use std::collections::HashMap;

const EQUITY: &str = "EQUITY";

/// Confirms ticker candidates against a market-data lookup.
///
/// Validation is best-effort and silent: lookup errors, unknown symbols and
/// malformed records all collapse to `false`. Results are memoised so a symbol
/// is looked up at most once for the lifetime of the validator (one run).
pub struct TickerValidator<L> {
    lookup: L,
    extractor: TickerExtractor,
    verdicts: HashMap<String, bool>,
}

impl<L: TickerLookup> TickerValidator<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            extractor: TickerExtractor::new(),
            verdicts: HashMap::new(),
        }
    }

    /// Look the symbol up and decide. Errors are logged and reported as invalid.
    pub async fn validate(&self, symbol: &str) -> bool {
        tracing::debug!("Validating ticker {}", symbol);
        match self.lookup.lookup(symbol).await {
            Ok(Some(record)) => accepts(symbol, &record),
            Ok(None) => {
                tracing::debug!("Ticker {} has no info", symbol);
                false
            }
            Err(e) => {
                tracing::error!("Error validating ticker {}: {}", symbol, e);
                false
            }
        }
    }

    /// Like [`validate`](Self::validate) but answers repeated symbols from the
    /// per-run memo instead of calling the lookup again.
    pub async fn validate_cached(&mut self, symbol: &str) -> bool {
        if let Some(&verdict) = self.verdicts.get(symbol) {
            return verdict;
        }
        let verdict = self.validate(symbol).await;
        self.verdicts.insert(symbol.to_string(), verdict);
        verdict
    }

    /// Extract candidates from `text` and keep the ones that validate, sorted.
    pub async fn get_valid_tickers(&mut self, text: &str) -> Vec<String> {
        let mut candidates: Vec<String> = self.extractor.extract_candidates(text).into_iter().collect();
        candidates.sort();
        tracing::debug!("Potential tickers found: {:?}", candidates);

        let mut valid = Vec::new();
        for candidate in candidates {
            if self.validate_cached(&candidate).await {
                tracing::debug!("Validated ticker: {}", candidate);
                valid.push(candidate);
            }
        }
        valid
    }

    /// Number of distinct symbols looked up so far.
    pub fn lookups_made(&self) -> usize {
        self.verdicts.len()
    }

    /// Forget all memoised verdicts before a new run.
    pub fn reset(&mut self) {
        self.verdicts.clear();
    }
}

/// A record is a tradable equity when it declares itself an equity, reports the
/// same symbol (case-insensitive) and has a nonzero market price.
pub fn accepts(symbol: &str, record: &QuoteRecord) -> bool {
    let (Some(instrument_type), Some(reported), Some(price)) = (
        record.instrument_type.as_deref(),
        record.symbol.as_deref(),
        record.regular_market_price,
    ) else {
        tracing::debug!("Ticker {} missing required fields", symbol);
        return false;
    };

    if !instrument_type.eq_ignore_ascii_case(EQUITY) {
        tracing::debug!("Ticker {} is not an equity: {}", symbol, instrument_type);
        return false;
    }

    if price == 0.0 || price.is_nan() || !reported.eq_ignore_ascii_case(symbol) {
        tracing::debug!("Ticker {} failed price/symbol validation", symbol);
        return false;
    }

    true
}

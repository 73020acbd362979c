use async_trait::async_trait;
use crate::{AnalysisError, Post, ProgressEvent, QuoteRecord};

/// Source of posts to analyze.
///
/// Implementations are fail-open: a failed fetch yields an empty list, which the
/// pipeline treats as "nothing to do".
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self) -> Vec<Post>;
}

/// Per-symbol market-data lookup used for ticker validation.
///
/// `Ok(None)` means the provider has no record for the symbol.
#[async_trait]
pub trait TickerLookup: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Result<Option<QuoteRecord>, AnalysisError>;
}

/// Scores a single sentence with a compound polarity in [-1, 1].
pub trait SentenceScorer: Send + Sync {
    fn score(&self, sentence: &str) -> f64;
}

/// Receives pipeline progress inline, on the caller's thread.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressEvent),
{
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event)
    }
}


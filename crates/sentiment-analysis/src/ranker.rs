use analysis_core::TickerSentiment;
use std::cmp::Ordering;

pub const DEFAULT_TOP_N: usize = 3;

/// All tickers ordered from most bullish to most bearish.
///
/// Equal scores are ordered by symbol so the ranking does not depend on map
/// iteration order.
pub fn ranked(sentiments: &TickerSentiment) -> Vec<(String, f64)> {
    let mut sorted: Vec<(String, f64)> = sentiments
        .iter()
        .map(|(ticker, score)| (ticker.clone(), *score))
        .collect();
    sorted.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    sorted
}

/// Top `top_n` bullish tickers (highest first) and top `top_n` bearish tickers
/// (most negative first).
///
/// The two lists are taken from opposite ends of the same ranking and are not
/// deduplicated: with `2 * top_n` or fewer tickers a symbol can appear in both.
pub fn top_sentiments(sentiments: &TickerSentiment, top_n: usize) -> (Vec<String>, Vec<String>) {
    let sorted = ranked(sentiments);

    let bullish: Vec<String> = sorted.iter().take(top_n).map(|(t, _)| t.clone()).collect();
    let bearish: Vec<String> = sorted
        .iter()
        .rev()
        .take(top_n)
        .map(|(t, _)| t.clone())
        .collect();

    (bullish, bearish)
}

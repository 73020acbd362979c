use analysis_core::{SentenceScorer, TickerSentiment};

pub mod ranker;
pub mod scorer;
pub mod sentences;

pub use ranker::{ranked, top_sentiments, DEFAULT_TOP_N};
pub use scorer::VaderScorer;
pub use sentences::split_sentences;

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Per-ticker sentiment from the sentences that mention each ticker.
pub struct SentimentAnalysisEngine<S = VaderScorer> {
    scorer: S,
}

impl SentimentAnalysisEngine<VaderScorer> {
    pub fn new() -> Self {
        Self::with_scorer(VaderScorer::new())
    }
}

impl Default for SentimentAnalysisEngine<VaderScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SentenceScorer> SentimentAnalysisEngine<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    /// Compound score for a piece of text, in [-1, 1].
    pub fn get_text_sentiment(&self, text: &str) -> f64 {
        self.scorer.score(text)
    }

    /// Sentences of `text` that contain `ticker` as a plain substring.
    ///
    /// There is no word-boundary check here, unlike ticker extraction: a
    /// sentence mentioning "NVDAX" also counts for "NVDA".
    pub fn get_sentences_with_ticker<'a>(&self, text: &'a str, ticker: &str) -> Vec<&'a str> {
        split_sentences(text)
            .into_iter()
            .filter(|sentence| sentence.contains(ticker))
            .collect()
    }

    /// Average sentence sentiment for every ticker.
    ///
    /// Every input ticker is present in the result. A ticker with no matching
    /// sentence scores exactly 0.0, which is indistinguishable from a ticker
    /// whose sentences average out to neutral.
    pub fn analyze_ticker_sentiment(&self, text: &str, tickers: &[String]) -> TickerSentiment {
        let sentences = split_sentences(text);

        tickers
            .iter()
            .map(|ticker| {
                let scores: Vec<f64> = sentences
                    .iter()
                    .filter(|sentence| sentence.contains(ticker.as_str()))
                    .map(|sentence| self.get_text_sentiment(sentence))
                    .collect();
                tracing::debug!("{}: {} sentences, scores {:?}", ticker, scores.len(), scores);
                (ticker.clone(), mean(&scores))
            })
            .collect()
    }

    /// Top `top_n` bullish and bearish tickers; see [`ranker::top_sentiments`].
    pub fn get_top_sentiments(
        &self,
        sentiments: &TickerSentiment,
        top_n: usize,
    ) -> (Vec<String>, Vec<String>) {
        top_sentiments(sentiments, top_n)
    }
}

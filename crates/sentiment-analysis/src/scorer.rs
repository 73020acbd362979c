use analysis_core::SentenceScorer;
use vader_sentiment::SentimentIntensityAnalyzer;

/// VADER compound-score sentence scorer.
///
/// VADER is tuned for social media text, which fits subreddit posts. The
/// compound score is already normalized to [-1, 1]; it is clamped anyway so a
/// lexicon quirk can never push a ticker average out of range.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceScorer for VaderScorer {
    /// Blank text and a missing compound score both score as neutral (0.0).
    fn score(&self, sentence: &str) -> f64 {
        if sentence.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(sentence);
        match scores.get("compound") {
            Some(&compound) if compound.is_finite() => compound.clamp(-1.0, 1.0),
            _ => {
                tracing::error!("No compound score for sentence: {:?}", sentence);
                0.0
            }
        }
    }
}

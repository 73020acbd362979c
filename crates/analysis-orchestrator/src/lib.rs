use analysis_core::{
    AnalysisError, PostSource, ProgressEvent, ProgressObserver, ProgressStep, SentenceScorer,
    TickerLookup, TickerSentiment,
};
use sentiment_analysis::{SentimentAnalysisEngine, VaderScorer, DEFAULT_TOP_N};
use sentiment_log::SentimentLog;
use serde::Serialize;
use std::collections::BTreeSet;
use ticker_extraction::TickerValidator;

/// Progress span covered by the per-post loop (10% to 50%).
const POSTS_START: f64 = 10.0;
const POSTS_SPAN: f64 = 40.0;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of tickers in each of the bullish and bearish lists.
    pub top_n: usize,
    /// Subreddit name, used in progress messages only.
    pub subreddit: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            subreddit: "stocks".to_string(),
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOutcome {
    pub bullish: Vec<String>,
    pub bearish: Vec<String>,
    pub sentiments: TickerSentiment,
    pub post_count: usize,
}

impl PipelineOutcome {
    pub fn is_empty(&self) -> bool {
        self.bullish.is_empty() && self.bearish.is_empty()
    }
}

/// Fetch, extract, validate, score, rank and log, in that order.
///
/// Everything runs on the caller's task. The observer is called inline at each
/// checkpoint and progress never decreases within a run.
pub struct SentimentPipeline<P, L, S = VaderScorer> {
    posts: P,
    validator: TickerValidator<L>,
    engine: SentimentAnalysisEngine<S>,
    log: SentimentLog,
    config: PipelineConfig,
}

impl<P, L> SentimentPipeline<P, L, VaderScorer>
where
    P: PostSource,
    L: TickerLookup,
{
    pub fn new(posts: P, lookup: L, log: SentimentLog, config: PipelineConfig) -> Self {
        Self::with_engine(posts, lookup, SentimentAnalysisEngine::new(), log, config)
    }
}

impl<P, L, S> SentimentPipeline<P, L, S>
where
    P: PostSource,
    L: TickerLookup,
    S: SentenceScorer,
{
    pub fn with_engine(
        posts: P,
        lookup: L,
        engine: SentimentAnalysisEngine<S>,
        log: SentimentLog,
        config: PipelineConfig,
    ) -> Self {
        Self {
            posts,
            validator: TickerValidator::new(lookup),
            engine,
            log,
            config,
        }
    }

    pub fn log(&self) -> &SentimentLog {
        &self.log
    }

    /// Run the whole pipeline once.
    ///
    /// No posts, or no validated tickers, is not an error: the run stops early
    /// with an empty outcome, nothing is logged, and the progress stream still
    /// ends with a `Complete` event at 100. A failed log write is reported
    /// through tracing and does not fail the run.
    pub async fn run(
        &mut self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<PipelineOutcome, AnalysisError> {
        let mut notify = |step: ProgressStep, message: String, progress: f64| {
            observer.on_progress(&ProgressEvent::new(step, message, progress));
        };

        self.validator.reset();

        let fetching = format!("Fetching posts from r/{}...", self.config.subreddit);
        tracing::info!("{}", fetching);
        notify(ProgressStep::FetchingPosts, fetching, 5.0);
        let posts = self.posts.fetch_posts().await;

        if posts.is_empty() {
            tracing::error!("No posts fetched from Reddit");
            notify(ProgressStep::Complete, "No posts to analyze".to_string(), 100.0);
            return Ok(PipelineOutcome::default());
        }

        let total = posts.len();
        notify(
            ProgressStep::ProcessingPosts,
            format!("Found {} posts to analyze", total),
            POSTS_START,
        );

        let mut all_tickers = BTreeSet::new();
        let mut combined_text = String::new();

        for (idx, post) in posts.iter().enumerate() {
            let number = idx + 1;
            notify(
                ProgressStep::ProcessingPosts,
                format!("Processing post {} of {}", number, total),
                POSTS_START + POSTS_SPAN * number as f64 / total as f64,
            );

            let post_text = post.text();
            combined_text.push(' ');
            combined_text.push_str(&post_text);

            let tickers = self.validator.get_valid_tickers(&post_text).await;
            all_tickers.extend(tickers);
        }

        if all_tickers.is_empty() {
            tracing::error!("No valid tickers found in posts");
            notify(ProgressStep::Complete, "No valid tickers found".to_string(), 100.0);
            return Ok(PipelineOutcome {
                post_count: total,
                ..PipelineOutcome::default()
            });
        }

        notify(
            ProgressStep::ProcessingTickers,
            format!("Processing {} found tickers...", all_tickers.len()),
            60.0,
        );
        tracing::info!(
            "Analyzing sentiment for {} tickers ({} lookups)...",
            all_tickers.len(),
            self.validator.lookups_made()
        );
        let tickers: Vec<String> = all_tickers.into_iter().collect();
        let sentiments = self.engine.analyze_ticker_sentiment(&combined_text, &tickers);

        if let Some((ticker, score)) = sentiments.iter().find(|(_, s)| !s.is_finite()) {
            return Err(AnalysisError::InvalidData(format!(
                "non-finite sentiment {} for {}",
                score, ticker
            )));
        }

        notify(
            ProgressStep::AnalyzingSentiment,
            "Analyzing sentiment...".to_string(),
            80.0,
        );
        let (bullish, bearish) = self.engine.get_top_sentiments(&sentiments, self.config.top_n);

        notify(
            ProgressStep::SavingResults,
            "Saving results...".to_string(),
            95.0,
        );
        tracing::info!("Saving results...");
        if let Err(e) = self.log.append(&bullish, &bearish) {
            tracing::error!("Error saving results: {}", e);
        }

        tracing::info!("Analysis completed successfully");
        tracing::info!("Top Bullish: {}", bullish.join(", "));
        tracing::info!("Top Bearish: {}", bearish.join(", "));
        notify(ProgressStep::Complete, "Analysis complete".to_string(), 100.0);

        Ok(PipelineOutcome {
            bullish,
            bearish,
            sentiments,
            post_count: total,
        })
    }
}

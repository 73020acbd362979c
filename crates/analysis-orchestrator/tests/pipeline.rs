use analysis_core::{
    AnalysisError, Post, PostSource, ProgressEvent, ProgressStep, QuoteRecord, SentenceScorer,
    TickerLookup,
};
use analysis_orchestrator::{PipelineConfig, SentimentPipeline};
use async_trait::async_trait;
use chrono::Utc;
use sentiment_analysis::SentimentAnalysisEngine;
use sentiment_log::SentimentLog;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct FakePosts(Vec<Post>);

#[async_trait]
impl PostSource for FakePosts {
    async fn fetch_posts(&self) -> Vec<Post> {
        self.0.clone()
    }
}

/// Accepts the listed symbols as equities; counts lookups.
struct FakeLookup {
    known: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TickerLookup for FakeLookup {
    async fn lookup(&self, symbol: &str) -> Result<Option<QuoteRecord>, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if symbol == "FAIL" {
            return Err(AnalysisError::ApiError("HTTP 500: boom".to_string()));
        }
        if !self.known.iter().any(|k| *k == symbol) {
            return Ok(None);
        }
        Ok(Some(QuoteRecord {
            instrument_type: Some("EQUITY".to_string()),
            symbol: Some(symbol.to_string()),
            regular_market_price: Some(100.0),
            long_name: None,
            currency: Some("USD".to_string()),
        }))
    }
}

struct FixedScorer(HashMap<&'static str, f64>);

impl SentenceScorer for FixedScorer {
    fn score(&self, sentence: &str) -> f64 {
        self.0.get(sentence).copied().unwrap_or(0.0)
    }
}

fn post(title: &str, body: &str) -> Post {
    Post {
        title: title.to_string(),
        body: body.to_string(),
        score: 1,
        created_at: Utc::now(),
    }
}

struct Harness {
    pipeline: SentimentPipeline<FakePosts, FakeLookup, FixedScorer>,
    calls: Arc<AtomicUsize>,
    _dir: tempfile::TempDir,
}

fn harness(
    posts: Vec<Post>,
    known: Vec<&'static str>,
    scores: &[(&'static str, f64)],
    top_n: usize,
) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let lookup = FakeLookup {
        known,
        calls: calls.clone(),
    };
    let engine = SentimentAnalysisEngine::with_scorer(FixedScorer(scores.iter().copied().collect()));
    let config = PipelineConfig {
        top_n,
        ..PipelineConfig::default()
    };
    let pipeline = SentimentPipeline::with_engine(
        FakePosts(posts),
        lookup,
        engine,
        SentimentLog::new(dir.path().join("sentiment_log.csv")),
        config,
    );
    Harness {
        pipeline,
        calls,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_single_post_scenario() {
    let mut h = harness(
        vec![post("NVDA to the moon", "")],
        vec!["NVDA"],
        &[("NVDA to the moon", 0.8)],
        3,
    );

    let outcome = h.pipeline.run(&mut |_: &ProgressEvent| {}).await.unwrap();

    assert_eq!(outcome.post_count, 1);
    assert_eq!(outcome.sentiments.len(), 1);
    assert_eq!(outcome.sentiments["NVDA"], 0.8);
    assert_eq!(outcome.bullish, vec!["NVDA"]);
    assert_eq!(outcome.bearish, vec!["NVDA"]);

    let rows = h.pipeline.log().read_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].top_bullish, vec!["NVDA"]);
    assert_eq!(rows[0].top_bearish, vec!["NVDA"]);
}

#[tokio::test]
async fn test_no_posts_short_circuits() {
    let mut h = harness(vec![], vec!["NVDA"], &[], 3);
    let mut events = Vec::new();

    let outcome = h
        .pipeline
        .run(&mut |e: &ProgressEvent| events.push(e.clone()))
        .await
        .unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.post_count, 0);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].step, ProgressStep::FetchingPosts);
    assert_eq!(events[1].step, ProgressStep::Complete);
    assert_eq!(events[1].progress, 100.0);
    assert_eq!(events[1].message, "No posts to analyze");
    assert!(!h.pipeline.log().path().exists());
}

#[tokio::test]
async fn test_no_valid_tickers_short_circuits() {
    // candidates exist but none validate; stopwords never reach the lookup
    let mut h = harness(
        vec![post("The CEO said ZZZZ is great", "FAIL to launch")],
        vec!["NVDA"],
        &[],
        3,
    );

    let mut events: Vec<ProgressEvent> = Vec::new();

    let outcome = h
        .pipeline
        .run(&mut |e: &ProgressEvent| events.push(e.clone()))
        .await
        .unwrap();

    assert!(outcome.is_empty());
    assert!(outcome.sentiments.is_empty());
    let last = events.last().unwrap();
    assert_eq!(last.step, ProgressStep::Complete);
    assert_eq!(last.progress, 100.0);
    assert_eq!(last.message, "No valid tickers found");
    assert!(events.iter().all(|e| e.step != ProgressStep::ProcessingTickers));
    assert_eq!(outcome.post_count, 1);
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
    assert!(h.pipeline.log().read_rows().unwrap().is_empty());
}

#[tokio::test]
async fn test_progress_is_monotonic_and_completes() {
    let posts = vec![
        post("AMD earnings", "AMD beat."),
        post("TSLA news", "TSLA missed."),
        post("Random", "nothing here"),
        post("AMD again", "Still AMD."),
    ];
    let mut h = harness(posts, vec!["AMD", "TSLA"], &[], 3);
    let mut events: Vec<ProgressEvent> = Vec::new();

    h.pipeline
        .run(&mut |e: &ProgressEvent| events.push(e.clone()))
        .await
        .unwrap();

    let progress: Vec<f64> = events.iter().map(|e| e.progress).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{:?}", progress);
    assert_eq!(progress.first(), Some(&5.0));
    assert_eq!(progress.last(), Some(&100.0));

    let steps: Vec<ProgressStep> = events.iter().map(|e| e.step).collect();
    assert_eq!(steps[0], ProgressStep::FetchingPosts);
    assert_eq!(steps[1], ProgressStep::ProcessingPosts);
    assert_eq!(*steps.last().unwrap(), ProgressStep::Complete);
    assert!(steps.contains(&ProgressStep::ProcessingTickers));
    assert!(steps.contains(&ProgressStep::AnalyzingSentiment));
    assert!(steps.contains(&ProgressStep::SavingResults));

    assert_eq!(events[1].message, "Found 4 posts to analyze");
    assert_eq!(events[2].message, "Processing post 1 of 4");
    assert_eq!(events[2].progress, 20.0);
    assert_eq!(events[5].message, "Processing post 4 of 4");
    assert_eq!(events[5].progress, 50.0);
    assert_eq!(events[6].message, "Processing 2 found tickers...");
    assert_eq!(events[6].progress, 60.0);
}

#[tokio::test]
async fn test_repeated_symbols_are_looked_up_once() {
    let posts = vec![
        post("AMD", "AMD AMD"),
        post("AMD and NVDA", ""),
        post("NVDA", "AMD"),
    ];
    let mut h = harness(posts, vec!["AMD", "NVDA"], &[], 3);

    h.pipeline.run(&mut |_: &ProgressEvent| {}).await.unwrap();
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_two_symbols_fill_both_lists() {
    let posts = vec![post("NVDA is great.", "INTC is awful.")];
    let mut h = harness(
        posts,
        vec!["NVDA", "INTC"],
        &[("NVDA is great.", 0.7), ("INTC is awful.", -0.6)],
        3,
    );

    let outcome = h.pipeline.run(&mut |_: &ProgressEvent| {}).await.unwrap();

    assert_eq!(outcome.bullish, vec!["NVDA", "INTC"]);
    assert_eq!(outcome.bearish, vec!["INTC", "NVDA"]);
}

#[tokio::test]
async fn test_sentences_span_posts_and_unvalidated_tickers_are_ignored() {
    let posts = vec![
        post("PLTR ripping today.", "ZZZZ is a scam."),
        post("Loading up on PLTR.", "GME flat."),
    ];
    let mut h = harness(
        posts,
        vec!["PLTR", "GME"],
        &[
            ("PLTR ripping today.", 0.6),
            ("Loading up on PLTR.", 0.2),
            ("ZZZZ is a scam.", -0.9),
        ],
        1,
    );

    let outcome = h.pipeline.run(&mut |_: &ProgressEvent| {}).await.unwrap();

    assert!(!outcome.sentiments.contains_key("ZZZZ"));
    assert!((outcome.sentiments["PLTR"] - 0.4).abs() < 1e-12);
    assert_eq!(outcome.sentiments["GME"], 0.0);
    assert_eq!(outcome.bullish, vec!["PLTR"]);
    assert_eq!(outcome.bearish, vec!["GME"]);
}

#[tokio::test]
async fn test_log_write_failure_does_not_fail_run() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    // the log path is an existing directory, so the append cannot open it
    let mut pipeline = SentimentPipeline::with_engine(
        FakePosts(vec![post("NVDA to the moon", "")]),
        FakeLookup {
            known: vec!["NVDA"],
            calls,
        },
        SentimentAnalysisEngine::with_scorer(FixedScorer(HashMap::new())),
        SentimentLog::new(dir.path()),
        PipelineConfig::default(),
    );

    let outcome = pipeline.run(&mut |_: &ProgressEvent| {}).await.unwrap();
    assert_eq!(outcome.bullish, vec!["NVDA"]);
}

#[tokio::test]
async fn test_each_run_appends_a_row() {
    let mut h = harness(vec![post("NVDA to the moon", "")], vec!["NVDA"], &[], 3);

    h.pipeline.run(&mut |_: &ProgressEvent| {}).await.unwrap();
    h.pipeline.run(&mut |_: &ProgressEvent| {}).await.unwrap();

    let rows = h.pipeline.log().read_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, rows[1].date);
    // verdicts are forgotten between runs
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
}

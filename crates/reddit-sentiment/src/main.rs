//! reddit-sentiment: daily bullish/bearish ticker report from a subreddit.
//!
//! Usage:
//!   cargo run -p reddit-sentiment                         # run the pipeline
//!   cargo run -p reddit-sentiment -- --top 5 --limit 100
//!   cargo run -p reddit-sentiment -- --history 7          # last 7 logged runs
//!   cargo run -p reddit-sentiment -- --details NVDA       # one-year stock summary

mod config;

use analysis_core::ProgressEvent;
use analysis_orchestrator::{PipelineConfig, SentimentPipeline};
use anyhow::{Context, Result};
use config::{AppConfig, Command};
use reddit_client::RedditClient;
use sentiment_log::{format_ticker_list, SentimentLog};
use yahoo_client::YahooClient;

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "reddit_sentiment=info,analysis_orchestrator=info,sentiment_log=info,\
                 ticker_extraction=warn,reddit_client=warn,yahoo_client=warn"
                    .into()
            }),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, overrides) = config::parse_args(&args)?;

    let mut config = AppConfig::from_env()?;
    config.apply(&overrides);

    // single-threaded: the pipeline and its progress observer share one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match command {
        Command::Run => runtime.block_on(analyze(&config)),
        Command::History(rows) => show_history(&config, rows),
        Command::Details(symbol) => runtime.block_on(show_details(&config, &symbol)),
    }
}

async fn analyze(config: &AppConfig) -> Result<()> {
    tracing::info!(
        "Analyzing r/{} (limit {}, top {}, log {})",
        config.subreddit,
        config.post_limit,
        config.top_n,
        config.log_path.display()
    );
    let reddit = RedditClient::new(config.reddit_config()?);
    let yahoo = YahooClient::new(config.http_timeout());
    let pipeline_config = PipelineConfig {
        top_n: config.top_n,
        subreddit: config.subreddit.clone(),
    };

    let mut pipeline = SentimentPipeline::new(
        reddit,
        yahoo,
        SentimentLog::new(&config.log_path),
        pipeline_config,
    );

    let mut render = |event: &ProgressEvent| eprintln!("{}", progress_line(event));
    let outcome = pipeline
        .run(&mut render)
        .await
        .context("sentiment analysis failed")?;

    if outcome.is_empty() {
        println!("No tickers found in r/{} (analyzed {} posts)", config.subreddit, outcome.post_count);
        return Ok(());
    }

    println!();
    print!("{}", ranked_list("Top Bullish", &outcome.bullish, config.top_n));
    println!();
    print!("{}", ranked_list("Top Bearish", &outcome.bearish, config.top_n));
    Ok(())
}

fn show_history(config: &AppConfig, rows: usize) -> Result<()> {
    let log = SentimentLog::new(&config.log_path);
    let history = log.read_rows()?;

    if history.is_empty() {
        println!("No results logged yet in {}", log.path().display());
        return Ok(());
    }

    let skip = history.len().saturating_sub(rows);
    println!("{:<12} {:<28} {}", "Date", "Bullish", "Bearish");
    for row in &history[skip..] {
        println!(
            "{:<12} {:<28} {}",
            row.date.format("%Y-%m-%d"),
            format_ticker_list(&row.top_bullish),
            format_ticker_list(&row.top_bearish)
        );
    }
    Ok(())
}

async fn show_details(config: &AppConfig, symbol: &str) -> Result<()> {
    let yahoo = YahooClient::new(config.http_timeout());
    let details = yahoo
        .get_stock_details(symbol)
        .await
        .with_context(|| format!("could not load details for {}", symbol))?;

    let currency = details.currency.as_deref().unwrap_or("USD");
    println!("{} ({})", details.name, details.symbol);
    println!("  Price:        {:.2} {}", details.price, currency);
    match details.period_change_percent() {
        Some(change) => println!("  1y change:    {:+.2}%", change),
        None => println!("  1y change:    n/a"),
    }
    match details.market_cap {
        Some(market_cap) => println!("  Market cap:   {}", format_market_cap(market_cap)),
        None => println!("  Market cap:   n/a"),
    }
    match details.pe_ratio {
        Some(pe) => println!("  P/E ratio:    {:.2}", pe),
        None => println!("  P/E ratio:    n/a"),
    }
    if let Some((high, low)) = details.period_range() {
        println!("  1y high/low:  {:.2} / {:.2}", high, low);
    }
    println!("  Daily bars:   {}", details.history.len());
    Ok(())
}

/// Market cap in billions or millions, whole dollars below that.
fn format_market_cap(market_cap: f64) -> String {
    if market_cap >= 1e9 {
        format!("${:.2}B", market_cap / 1e9)
    } else if market_cap >= 1e6 {
        format!("${:.2}M", market_cap / 1e6)
    } else {
        format!("${:.0}", market_cap)
    }
}

/// `[ 45%] Processing post 7 of 50`
fn progress_line(event: &ProgressEvent) -> String {
    format!("[{:>3.0}%] {}", event.progress, event.message)
}

/// Numbered list padded with `-` up to `slots` entries.
fn ranked_list(title: &str, tickers: &[String], slots: usize) -> String {
    let mut out = format!("{}:\n", title);
    for i in 0..slots.max(tickers.len()) {
        let ticker = tickers.get(i).map(String::as_str).unwrap_or("-");
        out.push_str(&format!("  {}. {}\n", i + 1, ticker));
    }
    out
}

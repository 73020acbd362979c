use anyhow::{Context, Result};
use reddit_client::RedditConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub subreddit: String,       // stocks
    pub post_limit: u32,         // 50
    pub top_n: usize,            // 3
    pub log_path: PathBuf,       // sentiment_log.csv
    pub http_timeout_secs: u64,  // 30
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            subreddit: env::var("REDDIT_SUBREDDIT").unwrap_or_else(|_| "stocks".to_string()),
            post_limit: env::var("REDDIT_POST_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .context("REDDIT_POST_LIMIT must be a positive integer")?,
            top_n: env::var("SENTIMENT_TOP_N")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("SENTIMENT_TOP_N must be a non-negative integer")?,
            log_path: env::var("SENTIMENT_LOG_PATH")
                .unwrap_or_else(|_| sentiment_log::DEFAULT_LOG_PATH.to_string())
                .into(),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a positive integer")?,
        };

        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Reddit credentials are only required for a pipeline run.
    pub fn reddit_config(&self) -> Result<RedditConfig> {
        let mut reddit = RedditConfig::new(
            env::var("REDDIT_CLIENT_ID").context("REDDIT_CLIENT_ID not set")?,
            env::var("REDDIT_CLIENT_SECRET").context("REDDIT_CLIENT_SECRET not set")?,
            env::var("REDDIT_USER_AGENT").context("REDDIT_USER_AGENT not set")?,
        );
        reddit.subreddit = self.subreddit.clone();
        reddit.limit = self.post_limit;
        reddit.timeout = self.http_timeout();
        Ok(reddit)
    }

    /// Apply command-line overrides on top of the environment values.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(top_n) = overrides.top_n {
            self.top_n = top_n;
        }
        if let Some(path) = &overrides.log_path {
            self.log_path = path.clone();
        }
        if let Some(subreddit) = &overrides.subreddit {
            self.subreddit = subreddit.clone();
        }
        if let Some(limit) = overrides.limit {
            self.post_limit = limit;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub top_n: Option<usize>,
    pub log_path: Option<PathBuf>,
    pub subreddit: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run,
    History(usize),
    Details(String),
}

pub const DEFAULT_HISTORY_ROWS: usize = 10;

/// Value following `flag`, if the flag is present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .filter(|v| !v.starts_with("--"))
            .map(Some)
            .with_context(|| format!("{} requires a value", flag)),
        None => Ok(None),
    }
}

/// Parse command-line arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<(Command, Overrides)> {
    let value_of = |flag: &str| flag_value(args, flag);

    let overrides = Overrides {
        top_n: value_of("--top")?
            .map(|v| v.parse())
            .transpose()
            .context("--top must be a non-negative integer")?,
        log_path: value_of("--log")?.map(PathBuf::from),
        subreddit: value_of("--subreddit")?.cloned(),
        limit: value_of("--limit")?
            .map(|v| v.parse())
            .transpose()
            .context("--limit must be a positive integer")?,
    };

    let command = if let Some(symbol) = value_of("--details")? {
        Command::Details(symbol.to_uppercase())
    } else if let Some(i) = args.iter().position(|a| a == "--history") {
        let rows = match args.get(i + 1).filter(|v| !v.starts_with("--")) {
            Some(v) => v.parse::<usize>().context("--history takes an optional row count")?,
            None => DEFAULT_HISTORY_ROWS,
        };
        Command::History(rows)
    } else {
        Command::Run
    };

    Ok((command, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    fn base() -> AppConfig {
        AppConfig {
            subreddit: "stocks".to_string(),
            post_limit: 50,
            top_n: 3,
            log_path: PathBuf::from("sentiment_log.csv"),
            http_timeout_secs: 30,
        }
    }

    #[test]
    fn test_default_is_run() {
        let (command, overrides) = parse_args(&[]).unwrap();
        assert_eq!(command, Command::Run);
        assert_eq!(overrides, Overrides::default());
    }

    #[test]
    fn test_overrides() {
        let (command, overrides) = parse_args(&args(&[
            "--top", "5", "--log", "/tmp/log.csv", "--subreddit", "wallstreetbets", "--limit", "100",
        ]))
        .unwrap();

        assert_eq!(command, Command::Run);
        let mut config = base();
        config.apply(&overrides);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.log_path, PathBuf::from("/tmp/log.csv"));
        assert_eq!(config.subreddit, "wallstreetbets");
        assert_eq!(config.post_limit, 100);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_history() {
        assert_eq!(parse_args(&args(&["--history"])).unwrap().0, Command::History(10));
        assert_eq!(parse_args(&args(&["--history", "3"])).unwrap().0, Command::History(3));
        assert_eq!(
            parse_args(&args(&["--history", "--log", "x.csv"])).unwrap().0,
            Command::History(10)
        );
        assert!(parse_args(&args(&["--history", "many"])).is_err());
    }

    #[test]
    fn test_details() {
        let (command, _) = parse_args(&args(&["--details", "nvda"])).unwrap();
        assert_eq!(command, Command::Details("NVDA".to_string()));
        assert!(parse_args(&args(&["--details"])).is_err());
    }

    #[test]
    fn test_bad_values() {
        assert!(parse_args(&args(&["--top", "three"])).is_err());
        assert!(parse_args(&args(&["--limit"])).is_err());
    }
}

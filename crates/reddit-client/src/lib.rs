//! Reddit client: application-only OAuth and the subreddit "top" listing.

pub mod error;

pub use error::{RedditError, RedditResult};

use analysis_core::{Post, PostSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_URL: &str = "https://oauth.reddit.com";

/// Credentials and listing parameters for the Reddit API.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub subreddit: String,
    /// Number of posts to request (Reddit caps a page at 100).
    pub limit: u32,
    /// Time window for the top listing: hour, day, week, month, year, all.
    pub time_filter: String,
    pub timeout: Duration,
}

impl RedditConfig {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client_id,
            client_secret,
            user_agent,
            subreddit: "stocks".to_string(),
            limit: 50,
            time_filter: "day".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct RedditClient {
    client: Client,
    config: RedditConfig,
}

impl RedditClient {
    pub fn new(config: RedditConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    pub fn subreddit(&self) -> &str {
        &self.config.subreddit
    }

    /// Obtain an application-only bearer token (client credentials grant).
    async fn access_token(&self) -> RedditResult<String> {
        if self.config.client_id.is_empty() {
            return Err(RedditError::MissingCredentials("client id"));
        }

        let response = self
            .client
            .post(AUTH_URL)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RedditError::AuthFailed(format!(
                "Status: {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the top posts of the configured subreddit for the configured window.
    pub async fn get_top_posts(&self) -> RedditResult<Vec<Post>> {
        let token = self.access_token().await?;
        let url = format!("{}/r/{}/top", API_URL, self.config.subreddit);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("t", self.config.time_filter.clone()),
                ("limit", self.config.limit.to_string()),
                ("raw_json", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RedditError::ServiceUnavailable(format!(
                "r/{} returned {}",
                self.config.subreddit,
                response.status()
            )));
        }

        let listing: Listing = response.json().await?;
        let posts = listing.into_posts();
        tracing::debug!("Fetched {} posts from r/{}", posts.len(), self.config.subreddit);
        Ok(posts)
    }
}

#[async_trait]
impl PostSource for RedditClient {
    /// Fail-open: any fetch error is logged and reported as "no posts".
    async fn fetch_posts(&self) -> Vec<Post> {
        match self.get_top_posts().await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("Error fetching posts from r/{}: {}", self.config.subreddit, e);
                Vec::new()
            }
        }
    }
}

// Response structures
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

impl Listing {
    fn into_posts(self) -> Vec<Post> {
        self.data
            .children
            .into_iter()
            .filter(|child| child.kind == "t3")
            .map(|child| {
                let s = child.data;
                Post {
                    title: s.title,
                    body: s.selftext,
                    score: s.score,
                    created_at: DateTime::from_timestamp(s.created_utc as i64, 0)
                        .unwrap_or_else(Utc::now),
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    kind: String,
    data: Submission,
}

#[derive(Debug, Deserialize)]
struct Submission {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    created_utc: f64,
}

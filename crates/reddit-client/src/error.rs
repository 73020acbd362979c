use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedditError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),
}

pub type RedditResult<T> = Result<T, RedditError>;

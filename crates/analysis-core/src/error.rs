use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Sentiment log error: {0}")]
    LogError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

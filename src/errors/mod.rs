use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    // Configuration errors
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed request returned HTTP {0}")]
    HttpStatus(u16),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // Notification errors
    #[error("Notification failed: {0}")]
    Notification(String),
}

impl From<telegram::TelegramError> for RelayError {
    fn from(err: telegram::TelegramError) -> Self {
        RelayError::Notification(err.to_string())
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

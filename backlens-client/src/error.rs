use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No API key configured (run `backlens init --api-key <KEY>`)")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Out of credits")]
    OutOfCredits,

    #[error("API returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

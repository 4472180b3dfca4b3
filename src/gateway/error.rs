use reqwest::StatusCode;
use thiserror::Error;

/// Shown to the user for every fetch failure, whatever the cause.
pub const LOAD_FAILED_MESSAGE: &str = "Unable to load predictions. Check that the API is running.";

/// Why a request to the prediction service failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("prediction service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("prediction service error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed prediction payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// The causes are logged, not shown: the user gets one message.
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILED_MESSAGE
    }
}

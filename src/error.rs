use thiserror::Error;

/// Errors raised by the notifier components. None of them are retried; they
/// propagate up to the dispatcher, which turns them into a 500 response.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Request failed: {code} {message}")]
    RequestFailed { code: u16, message: String },

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SLACK_WEBHOOK_URL environment variable is not set")]
    MissingWebhookUrl,

    #[error("Billing query failed: {0}")]
    BillingQueryFailed(String),

    #[error("Unknown function type: {0}")]
    UnknownFunctionType(String),
}

pub type Result<T> = std::result::Result<T, Error>;

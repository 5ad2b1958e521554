use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid service URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

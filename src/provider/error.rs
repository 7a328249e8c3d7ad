use std::time::Duration;

use reqwest::StatusCode;

use crate::auth::{ErrorResponse, InvalidTokenResponse};

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("could not encode token request: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint did not answer within {0:?}")]
    Timeout(Duration),
    #[error(
        "token endpoint returned {status}{}",
        .error.as_ref().map(|e| format!(": {}", e)).unwrap_or_default()
    )]
    Rejected {
        status: StatusCode,
        error: Option<ErrorResponse>,
    },
    #[error("could not decode token response: {0}")]
    Decode(String),
    #[error(transparent)]
    Invalid(#[from] InvalidTokenResponse),
}

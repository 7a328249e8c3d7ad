use warp::http::StatusCode;
use warp::reply::Response;
use warp::Rejection;

use super::reply;

/// Ways a request can fail on its way through the authorization flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRejection {
    InvalidState,
    MissingCode,
    TokenUnavailable,
    AuthorizationUrl,
    BodyTooLarge,
}

impl warp::reject::Reject for FlowRejection {}

impl FlowRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidState | Self::MissingCode => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TokenUnavailable | Self::AuthorizationUrl => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidState => "State invalid",
            Self::MissingCode => "Code not found",
            Self::TokenUnavailable => "Unable to fetch token",
            Self::AuthorizationUrl => "Internal Server Error",
            Self::BodyTooLarge => "Request body too large",
        }
    }
}

/// Answers flow failures only; everything else keeps propagating.
pub async fn handle_flow_reject(err: Rejection) -> Result<Response, Rejection> {
    match err.find::<FlowRejection>() {
        Some(e) => Ok(reply::text(e.status(), e.message())),
        None => Err(err),
    }
}

pub async fn handle_reject(err: Rejection) -> Result<Response, Rejection> {
    if let Some(e) = err.find::<FlowRejection>() {
        return Ok(reply::text(e.status(), e.message()));
    }
    if err.is_not_found() {
        return Ok(reply::text(StatusCode::NOT_FOUND, "404 page not found"));
    }
    Err(err)
}

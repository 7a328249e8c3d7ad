use std::sync::Arc;

use tracing::{event, Level};
use warp::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use warp::reply::Reply;
use warp::Filter;

use crate::core::models::Token;
use crate::core::types::{AuthCode, State};
use crate::http::encoding::error::{handle_flow_reject, FlowRejection};
use crate::http::encoding::{self, reply::PrettyJson, CallbackParams};
use crate::provider::TokenExchange;

use super::exact_path;

pub fn callback_endpoint<E>(
    state: Arc<State>,
    exchange: Arc<E>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
where
    E: TokenExchange + 'static,
{
    let with_state = warp::any().map(move || state.clone());
    let with_exchange = warp::any().map(move || exchange.clone());

    // Flow failures are recovered here so they carry the CORS header too.
    exact_path("/oauth2")
        .and(encoding::callback_params())
        .and(with_state)
        .and(with_exchange)
        .and_then(
            |params: CallbackParams, state: Arc<State>, exchange: Arc<E>| async move {
                redeem(params, &state, &*exchange)
                    .await
                    .map(|token| PrettyJson::encode(&token).into_response())
                    .map_err(warp::reject::custom)
            },
        )
        .recover(handle_flow_reject)
        .with(warp::reply::with::header(ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
}

#[tracing::instrument(skip_all)]
pub async fn redeem<E>(
    params: CallbackParams,
    expected: &State,
    exchange: &E,
) -> Result<Token, FlowRejection>
where
    E: TokenExchange + ?Sized,
{
    if !expected.matches(params.state.as_deref().unwrap_or_default()) {
        event!(Level::WARN, "Callback state does not match");
        return Err(FlowRejection::InvalidState);
    }

    let code = match params.code {
        Some(code) if !code.is_empty() => AuthCode(code),
        _ => {
            event!(Level::WARN, "Callback carried no authorization code");
            return Err(FlowRejection::MissingCode);
        }
    };

    match exchange.exchange(&code).await {
        Ok(token) => {
            event!(Level::INFO, "Authorization code exchanged");
            Ok(token)
        }
        Err(e) => {
            event!(Level::ERROR, error = %e, "Token exchange failed");
            Err(FlowRejection::TokenUnavailable)
        }
    }
}

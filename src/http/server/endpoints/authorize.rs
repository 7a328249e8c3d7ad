use std::sync::Arc;

use tracing::{event, Level};
use warp::Filter;

use crate::auth::AuthorizationRequest;
use crate::core::models::ClientConfig;
use crate::core::types::State;
use crate::http::encoding::{error::FlowRejection, reply};

pub fn authorize_endpoint(
    config: Arc<ClientConfig>,
    state: Arc<State>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_config = warp::any().map(move || config.clone());
    let with_state = warp::any().map(move || state.clone());

    warp::path::end()
        .and(warp::get())
        .and(with_config)
        .and(with_state)
        .and_then(|config: Arc<ClientConfig>, state: Arc<State>| async move {
            AuthorizationRequest::new(&config, &state)
                .to_url(&config.auth_url)
                .map(|url| reply::anchor(&url))
                .map_err(|e| {
                    event!(Level::ERROR, error = %e, "Failed to build authorization URL");
                    warp::reject::custom(FlowRejection::AuthorizationUrl)
                })
        })
}

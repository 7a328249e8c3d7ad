use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{event, Level};
use warp::Filter;

use crate::core::models::ClientConfig;
use crate::core::types::State;
use crate::provider::TokenExchange;

pub mod endpoints;

use endpoints::{authorize::authorize_endpoint, callback::callback_endpoint};

use super::encoding::error::handle_reject;

#[derive(Debug)]
pub struct Server<E> {
    config: Arc<ClientConfig>,
    state: Arc<State>,
    exchange: Arc<E>,
}

impl<E: TokenExchange + 'static> Server<E> {
    pub fn new(config: Arc<ClientConfig>, state: State, exchange: Arc<E>) -> Self {
        Self {
            config,
            state: Arc::new(state),
            exchange,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone + Send + Sync + 'static
    {
        let authorize = authorize_endpoint(self.config.clone(), self.state.clone());
        let callback = callback_endpoint(self.state.clone(), self.exchange.clone());

        authorize
            .or(callback)
            .recover(handle_reject)
            .with(warp::log("vatlink::http"))
    }

    pub async fn serve(
        self,
        addr: SocketAddr,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), warp::Error> {
        let (bound, server) =
            warp::serve(self.routes()).try_bind_with_graceful_shutdown(addr, shutdown)?;

        event!(Level::INFO, address = %bound, "Listening");
        server.await;
        event!(Level::INFO, "Server stopped");

        Ok(())
    }
}

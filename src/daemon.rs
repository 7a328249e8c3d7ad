use std::sync::Arc;

use tracing::{event, Level};

use crate::auth::AuthorizationRequest;
use crate::http::server::Server;
use crate::provider::{ExchangeError, HttpTokenExchange};
use crate::util::cli::Options;
use crate::util::config::{ConfigError, Settings};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unable to build authorization URL: {0}")]
    AuthorizationUrl(#[from] serde_urlencoded::ser::Error),
    #[error("unable to build token client: {0}")]
    Client(#[from] ExchangeError),
    #[error("unable to start server: {0}")]
    Server(#[from] warp::Error),
}

pub async fn vatlinkd(opts: Options) -> Result<(), StartupError> {
    let settings = Settings::load(&opts.env_file)?;
    let config = Arc::new(settings.client_config()?);

    // Surface a broken authorization URL now rather than on the first request.
    AuthorizationRequest::new(&config, &settings.state).to_url(&config.auth_url)?;

    let exchange = Arc::new(HttpTokenExchange::new(
        config.clone(),
        settings.exchange_timeout,
    )?);

    event!(
        Level::INFO,
        client_id = ?config.client_id,
        redirect_uri = %config.redirect_uri,
        "Starting authorization flow server"
    );

    Server::new(config, settings.state.clone(), exchange)
        .serve(settings.listen_addr(), shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => event!(Level::INFO, "Shutting down"),
        Err(e) => {
            event!(Level::ERROR, error = %e, "Unable to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}

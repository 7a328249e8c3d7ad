use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{event, Level};

use crate::auth::{AccessTokenRequest, AccessTokenResponse, ErrorResponse};
use crate::core::models::{AuthStyle, ClientConfig, Token};
use crate::core::types::{AuthCode, GrantType};

use super::{ExchangeError, TokenExchange};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug)]
pub struct HttpTokenExchange {
    config: Arc<ClientConfig>,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTokenExchange {
    pub fn new(config: Arc<ClientConfig>, timeout: Duration) -> Result<Self, ExchangeError> {
        let client = reqwest::Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            config,
            client,
            timeout,
        })
    }

    async fn request_token(&self, code: &AuthCode) -> Result<Token, ExchangeError> {
        let config = &self.config;
        let in_params = config.auth_style == AuthStyle::InParams;

        let body = AccessTokenRequest {
            grant_type: GrantType::AuthorizationCode,
            code,
            redirect_uri: &config.redirect_uri,
            client_id: Some(&config.client_id).filter(|_| in_params),
            client_secret: Some(config.client_secret.0.as_str()).filter(|_| in_params),
        };
        let form = serde_urlencoded::to_string(&body)?;

        let mut request = self
            .client
            .post(config.token_url.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form);
        if !in_params {
            request = request.basic_auth(&config.client_id.0, Some(&config.client_secret.0));
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type)
            .unwrap_or_default();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorResponse>(&bytes).ok();
            return Err(ExchangeError::Rejected { status, error });
        }

        let raw: AccessTokenResponse = match content_type.as_str() {
            FORM_CONTENT_TYPE | "text/plain" => serde_urlencoded::from_bytes(&bytes)
                .map_err(|e| ExchangeError::Decode(e.to_string()))?,
            _ => serde_json::from_slice(&bytes).map_err(|e| ExchangeError::Decode(e.to_string()))?,
        };

        Ok(raw.into_token(Utc::now())?)
    }
}

fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    #[tracing::instrument(skip_all)]
    async fn exchange(&self, code: &AuthCode) -> Result<Token, ExchangeError> {
        event!(Level::DEBUG, token_url = %self.config.token_url, "Exchanging authorization code");
        match tokio::time::timeout(self.timeout, self.request_token(code)).await {
            Ok(result) => result,
            Err(_) => Err(ExchangeError::Timeout(self.timeout)),
        }
    }
}

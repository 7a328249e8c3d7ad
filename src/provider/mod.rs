use async_trait::async_trait;

use crate::core::models::Token;
use crate::core::types::AuthCode;

pub mod error;
pub mod http;

pub use error::ExchangeError;
pub use http::HttpTokenExchange;

/// Trades an authorization code for a token at the token endpoint.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, code: &AuthCode) -> Result<Token, ExchangeError>;
}

use std::str::FromStr;

use chrono::{DateTime, Utc};
use url::Url;

use super::types::*;

/// How the client authenticates itself to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `client_id` and `client_secret` travel in the form body.
    InParams,
    /// HTTP Basic `Authorization` header.
    InHeader,
}

impl Default for AuthStyle {
    fn default() -> Self {
        Self::InParams
    }
}

impl FromStr for AuthStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "params" => Ok(Self::InParams),
            "header" => Ok(Self::InHeader),
            other => Err(format!("expected \"params\" or \"header\", got {:?}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub scope: Scope,
    pub redirect_uri: RedirectUri,
    pub auth_url: Url,
    pub token_url: Url,
    pub auth_style: AuthStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

use chrono::{DateTime, Duration, Utc};

use crate::core::models::Token;
use crate::core::types::{AuthCode, ClientId, GrantType, RedirectUri};

pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Form body of the authorization-code grant (RFC 6749 §4.1.3).
#[derive(Debug, serde::Serialize)]
pub struct AccessTokenRequest<'r> {
    pub grant_type: GrantType,
    pub code: &'r AuthCode,
    pub redirect_uri: &'r RedirectUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'r ClientId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<&'r str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> Result<i64, InvalidTokenResponse> {
        match self {
            Self::Seconds(s) => Ok(*s),
            Self::Text(t) if t.trim().is_empty() => Ok(0),
            Self::Text(t) => t
                .trim()
                .parse()
                .map_err(|_| InvalidTokenResponse::ExpiresIn(t.clone())),
        }
    }
}

/// Successful token endpoint response, as decoded from JSON or from a
/// form-encoded body.
#[derive(Debug, Default, serde::Deserialize)]
pub struct AccessTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<ExpiresIn>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTokenResponse {
    #[error("server response missing access_token")]
    MissingAccessToken,
    #[error("expires_in is not a number of seconds: {0:?}")]
    ExpiresIn(String),
}

impl AccessTokenResponse {
    pub fn into_token(self, now: DateTime<Utc>) -> Result<Token, InvalidTokenResponse> {
        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(InvalidTokenResponse::MissingAccessToken)?;

        let expiry = match &self.expires_in {
            Some(e) => match e.seconds()? {
                0 => None,
                secs => Some(
                    Duration::try_seconds(secs)
                        .and_then(|d| now.checked_add_signed(d))
                        .ok_or_else(|| InvalidTokenResponse::ExpiresIn(secs.to_string()))?,
                ),
            },
            None => None,
        };

        let token_type = self
            .token_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());

        Ok(Token {
            access_token,
            token_type,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expiry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn request_omits_credentials_when_absent() {
        let code = AuthCode("XYZ".to_string());
        let uri = RedirectUri("http://localhost:8080/oauth2".to_string());
        let req = AccessTokenRequest {
            grant_type: GrantType::AuthorizationCode,
            code: &code,
            redirect_uri: &uri,
            client_id: None,
            client_secret: None,
        };
        assert_eq!(
            serde_urlencoded::to_string(&req).unwrap(),
            "grant_type=authorization_code&code=XYZ&redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Foauth2"
        );
    }

    #[test]
    fn expires_in_becomes_an_absolute_expiry() {
        let raw: AccessTokenResponse = serde_json::from_str(
            r#"{"access_token":"tok","token_type":"bearer","refresh_token":"ref","expires_in":14400}"#,
        )
        .unwrap();
        let token = raw.into_token(now()).unwrap();

        assert_eq!(token.access_token, "tok");
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.refresh_token.as_deref(), Some("ref"));
        assert_eq!(token.expiry, Some(Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap()));
    }

    #[test]
    fn form_encoded_responses_decode_too() {
        let raw: AccessTokenResponse =
            serde_urlencoded::from_str("access_token=tok&expires_in=60&scope=read%3Avat").unwrap();
        let token = raw.into_token(now()).unwrap();

        assert_eq!(token.token_type, DEFAULT_TOKEN_TYPE);
        assert_eq!(token.expiry, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap()));
        assert_eq!(token.refresh_token, None);
    }

    #[test]
    fn zero_lifetime_means_no_expiry() {
        let raw: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"tok","expires_in":0}"#).unwrap();
        assert_eq!(raw.into_token(now()).unwrap().expiry, None);
    }

    #[test]
    fn missing_access_token_is_rejected() {
        let raw: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"","token_type":"bearer"}"#).unwrap();
        assert_eq!(
            raw.into_token(now()),
            Err(InvalidTokenResponse::MissingAccessToken)
        );
    }

    #[test]
    fn garbage_lifetime_is_rejected() {
        let raw: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"tok","expires_in":"soon"}"#).unwrap();
        assert_eq!(
            raw.into_token(now()),
            Err(InvalidTokenResponse::ExpiresIn("soon".to_string()))
        );
    }
}

use url::Url;

use crate::core::models::ClientConfig;
use crate::core::types::{ClientId, RedirectUri, ResponseType, Scope, State};

/// Query parameters of an authorization-code request (RFC 6749 §4.1.1).
#[derive(Debug, serde::Serialize)]
pub struct AuthorizationRequest<'r> {
    pub client_id: &'r ClientId,
    pub redirect_uri: &'r RedirectUri,
    pub response_type: ResponseType,
    pub scope: &'r Scope,
    pub state: &'r State,
}

impl<'r> AuthorizationRequest<'r> {
    pub fn new(config: &'r ClientConfig, state: &'r State) -> Self {
        Self {
            client_id: &config.client_id,
            redirect_uri: &config.redirect_uri,
            response_type: ResponseType::Code,
            scope: &config.scope,
            state,
        }
    }

    /// Appends this request to `base`, keeping any query it already has.
    pub fn to_url(&self, base: &Url) -> Result<Url, serde_urlencoded::ser::Error> {
        let mut url = base.clone();
        let new_qs = serde_urlencoded::to_string(self)?;
        let pairs = form_urlencoded::parse(new_qs.as_bytes());
        url.query_pairs_mut().extend_pairs(pairs);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::AuthStyle;
    use crate::core::types::ClientSecret;

    fn config(api: &str) -> ClientConfig {
        ClientConfig {
            client_id: ClientId("vat-client".to_string()),
            client_secret: ClientSecret("s3cret".to_string()),
            scope: Scope::from_parts(vec!["read:vat", "write:vat"]),
            redirect_uri: RedirectUri("http://localhost:8080/oauth2".to_string()),
            auth_url: Url::parse(&format!("{}/oauth/authorize", api)).unwrap(),
            token_url: Url::parse(&format!("{}/oauth/token", api)).unwrap(),
            auth_style: AuthStyle::InParams,
        }
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn url_carries_every_authorization_parameter() {
        let config = config("https://test-api.service.hmrc.gov.uk");
        let state = State("abc123".to_string());
        let url = AuthorizationRequest::new(&config, &state)
            .to_url(&config.auth_url)
            .unwrap();

        assert_eq!(url.path(), "/oauth/authorize");
        assert_eq!(
            pairs(&url),
            vec![
                ("client_id".to_string(), "vat-client".to_string()),
                (
                    "redirect_uri".to_string(),
                    "http://localhost:8080/oauth2".to_string()
                ),
                ("response_type".to_string(), "code".to_string()),
                ("scope".to_string(), "read:vat write:vat".to_string()),
                ("state".to_string(), "abc123".to_string()),
            ]
        );
    }

    #[test]
    fn scope_is_space_delimited_on_the_wire() {
        let config = config("https://test-api.service.hmrc.gov.uk");
        let state = State("abc123".to_string());
        let url = AuthorizationRequest::new(&config, &state)
            .to_url(&config.auth_url)
            .unwrap();

        assert!(url.as_str().contains("scope=read%3Avat+write%3Avat"));
    }

    #[test]
    fn existing_query_is_preserved() {
        let mut config = config("https://test-api.service.hmrc.gov.uk");
        config.auth_url = Url::parse("https://auth.example.com/authorize?tenant=uk").unwrap();
        let state = State("s".to_string());
        let url = AuthorizationRequest::new(&config, &state)
            .to_url(&config.auth_url)
            .unwrap();

        let pairs = pairs(&url);
        assert_eq!(pairs[0], ("tenant".to_string(), "uk".to_string()));
        assert!(pairs.contains(&("state".to_string(), "s".to_string())));
    }
}

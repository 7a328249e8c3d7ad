use std::{collections::BTreeSet, fmt};

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scope(BTreeSet<String>);

impl Scope {
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn as_joined(&self) -> String {
        self.0
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_joined())
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

#[derive(Clone)]
pub struct ClientSecret(pub String);

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(..)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct RedirectUri(pub String);

impl fmt::Display for RedirectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-use code handed back by the authorization server on the redirect.
#[derive(Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct AuthCode(pub String);

impl fmt::Debug for AuthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthCode(..)")
    }
}

/// The `state` value round-tripped through the authorization server.
///
/// This is a single configured value shared by every authorization request,
/// not a per-request nonce.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct State(pub String);

impl State {
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_joins_in_a_stable_order() {
        let scope = Scope::from_parts(vec!["write:vat", "read:vat"]);
        assert_eq!(scope.as_joined(), "read:vat write:vat");
    }

    #[test]
    fn duplicate_scopes_collapse() {
        let scope = Scope::from_parts(vec!["read:vat", "read:vat"]);
        assert_eq!(scope.as_joined(), "read:vat");
    }

    #[test]
    fn scope_serializes_as_a_single_string() {
        let scope = Scope::from_parts(vec!["write:vat", "read:vat"]);
        let json = serde_json::to_string(&scope).unwrap();
        assert_eq!(json, "\"read:vat write:vat\"");
    }

    #[test]
    fn secrets_stay_out_of_debug_output() {
        let secret = ClientSecret("hunter2".to_string());
        let code = AuthCode("one-time".to_string());
        assert!(!format!("{:?}", secret).contains("hunter2"));
        assert!(!format!("{:?}", code).contains("one-time"));
    }

    #[test]
    fn state_requires_exact_match() {
        let state = State("abc123".to_string());
        assert!(state.matches("abc123"));
        assert!(!state.matches("ABC123"));
        assert!(!state.matches("abc123 "));
        assert!(!state.matches(""));
    }
}

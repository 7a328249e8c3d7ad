use std::fmt;

/// Error body returned by the token endpoint (RFC 6749 §5.2).
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "error")]
    pub kind: String,
    #[serde(rename = "error_description")]
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "error_uri")]
    #[serde(default)]
    pub uri: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)?;
        if let Some(description) = &self.description {
            write!(f, " ({})", description)?;
        }
        if let Some(uri) = &self.uri {
            write!(f, " <{}>", uri)?;
        }
        Ok(())
    }
}

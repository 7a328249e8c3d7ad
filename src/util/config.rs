//! Startup configuration.
//!
//! Values come from the process environment. Outside production a flat JSON
//! file is layered on top, its keys taking precedence. Nothing here writes back
//! to the process environment; the result is frozen into [`Settings`].

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{event, Level};
use url::Url;

use crate::core::models::{AuthStyle, ClientConfig};
use crate::core::types::{ClientId, ClientSecret, RedirectUri, Scope, State};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_EXCHANGE_TIMEOUT_SECS: u64 = 30;
pub const PRODUCTION: &str = "production";
pub const SCOPES: [&str; 2] = ["read:vat", "write:vat"];
pub const CALLBACK_PATH: &str = "/oauth2";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to open {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to decode JSON in {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must hold a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("{key} in {} must be a string, number, boolean or null", .path.display())]
    NestedValue { path: PathBuf, key: String },
    #[error("invalid {key} {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Variable lookup built from the process environment, optionally overlaid.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { vars }
    }

    pub fn overlay(&mut self, values: HashMap<String, String>) {
        self.vars.extend(values);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn is_production(&self) -> bool {
        self.get("NODE_PROCESS") == Some(PRODUCTION)
    }
}

/// Reads a flat JSON object into string values.
///
/// Strings are taken verbatim, numbers and booleans keep their JSON text and
/// `null` reads as an empty string.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let contents = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_slice(&contents).map_err(|source| ConfigError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let object = match value {
        serde_json::Value::Object(object) => object,
        _ => {
            return Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            })
        }
    };

    object
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                v @ serde_json::Value::Number(_) | v @ serde_json::Value::Bool(_) => v.to_string(),
                _ => {
                    return Err(ConfigError::NestedValue {
                        path: path.to_path_buf(),
                        key,
                    })
                }
            };
            Ok((key, value))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub server_url: String,
    pub api_url: String,
    pub port: u16,
    pub state: State,
    pub bind_address: IpAddr,
    pub exchange_timeout: Duration,
    pub auth_style: AuthStyle,
}

impl Settings {
    /// Loads settings from the process environment, seeded from `env_file`
    /// unless `NODE_PROCESS` is `production`.
    pub fn load(env_file: &Path) -> Result<Self, ConfigError> {
        let mut env = Env::from_process();
        if !env.is_production() {
            event!(Level::DEBUG, file = %env_file.display(), "Loading environment file");
            env.overlay(read_env_file(env_file)?);
        }
        Self::from_env(&env)
    }

    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let port = match env.non_empty("PORT") {
            Some(port) => parse_var("PORT", port)?,
            None => {
                event!(Level::INFO, port = DEFAULT_PORT, "Defaulting to port");
                DEFAULT_PORT
            }
        };

        let bind_address = match env.non_empty("BIND_ADDRESS") {
            Some(addr) => parse_var("BIND_ADDRESS", addr)?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let exchange_timeout = match env.non_empty("EXCHANGE_TIMEOUT_SECS") {
            Some(secs) => match parse_var::<u64>("EXCHANGE_TIMEOUT_SECS", secs)? {
                0 => return Err(invalid("EXCHANGE_TIMEOUT_SECS", secs, "must be positive")),
                secs => Duration::from_secs(secs),
            },
            None => Duration::from_secs(DEFAULT_EXCHANGE_TIMEOUT_SECS),
        };

        let auth_style = match env.non_empty("TOKEN_AUTH_STYLE") {
            Some(style) => style
                .parse()
                .map_err(|reason| invalid("TOKEN_AUTH_STYLE", style, reason))?,
            None => AuthStyle::default(),
        };

        Ok(Self {
            client_id: ClientId(env.get_or_empty("CLIENT_ID")),
            client_secret: ClientSecret(env.get_or_empty("CLIENT_SECRET")),
            server_url: env.get_or_empty("SERVER_URL"),
            api_url: env.get_or_empty("HMRC_API_URL"),
            port,
            state: State(env.get_or_empty("STATE_CHECK")),
            bind_address,
            exchange_timeout,
            auth_style,
        })
    }

    pub fn redirect_uri(&self) -> RedirectUri {
        RedirectUri(format!("{}:{}{}", self.server_url, self.port, CALLBACK_PATH))
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scope: Scope::from_parts(SCOPES),
            redirect_uri: self.redirect_uri(),
            auth_url: self.endpoint("/oauth/authorize")?,
            token_url: self.endpoint("/oauth/token")?,
            auth_style: self.auth_style,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let raw = format!("{}{}", self.api_url, path);
        let url = Url::parse(&raw).map_err(|e| invalid("HMRC_API_URL", &self.api_url, e))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "HMRC_API_URL",
                &self.api_url,
                "expected an absolute http(s) URL",
            ));
        }
        Ok(url)
    }
}

fn parse_var<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| invalid(key, value, e))
}

fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

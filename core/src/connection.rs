//! Connection descriptor: where the server is and who is calling.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const SERVER_URL_VAR: &str = "SONARQUBE_URL";
pub const LOGIN_VAR: &str = "SONARQUBE_LOGIN";
pub const PASSWORD_VAR: &str = "SONARQUBE_PASSWORD";

/// Login and password for basic authentication. A user token is passed as
/// the login with an empty password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self::new(token, "")
    }

    pub(crate) fn authorization_header(&self) -> String {
        let pair = format!("{}:{}", self.login, self.password);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server base address plus optional credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionInfo {
    pub server_url: Url,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

impl ConnectionInfo {
    pub fn new(server_url: Url) -> Self {
        Self {
            server_url,
            credentials: None,
        }
    }

    pub fn parse(server_url: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Url::parse(server_url)?))
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Reads `SONARQUBE_URL` and, when set, `SONARQUBE_LOGIN` /
    /// `SONARQUBE_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(SERVER_URL_VAR).map_err(|_| ConfigError::MissingVariable { name: SERVER_URL_VAR })?;
        let mut connection = Self::parse(&url)?;
        if let Ok(login) = std::env::var(LOGIN_VAR) {
            let password = std::env::var(PASSWORD_VAR).unwrap_or_default();
            connection = connection.with_credentials(Credentials::new(login, password));
        }
        Ok(connection)
    }

    /// The server address as a join base: always ends with `/` so relative
    /// paths extend it rather than replace its last segment.
    pub(crate) fn base_url(&self) -> Result<Url, ConfigError> {
        if self.server_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidServerUrl {
                url: self.server_url.to_string(),
            });
        }
        let mut base = self.server_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(base)
    }
}

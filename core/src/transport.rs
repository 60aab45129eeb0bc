//! `Transport` backed by `reqwest`.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ConfigError;
use crate::http::{BoxError, HttpRequest, HttpResponse, Transport};

const USER_AGENT: &str = concat!("sonarqube-client/", env!("CARGO_PKG_VERSION"));

/// Sends requests through a pooled `reqwest::Client`.
///
/// `new` does not follow redirects; a 3xx reaches the caller as a status.
/// After `release` the pool is dropped and further sends fail.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Mutex<Option<reqwest::Client>>,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(ConfigError::Transport)?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client: Mutex::new(Some(client)),
        }
    }

    fn client(&self) -> Option<reqwest::Client> {
        match self.client.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let client = self.client().ok_or("transport has been released")?;

        let mut builder = client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn release(&self) {
        let mut guard = match self.client.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            debug!("released reqwest connection pool");
        }
    }
}

//! The single send/classify/decode path shared by every endpoint.
//!
//! # Design
//! A call races three futures: the caller's cancellation token, a timer for
//! the configured request timeout, and the transport. Whichever finishes
//! first decides the call. Status classification happens before decoding so
//! a non-success body is never read.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};
use url::Url;

use crate::connection::ConnectionInfo;
use crate::endpoint::Endpoint;
use crate::error::{CancelReason, ClientError, ConfigError};
use crate::http::{HttpRequest, Transport};
use crate::outcome::Outcome;

pub(crate) struct Executor {
    base_url: Url,
    authorization: Option<String>,
    request_timeout: Duration,
    transport: Box<dyn Transport>,
}

impl Executor {
    pub(crate) fn new(
        connection: &ConnectionInfo,
        transport: Box<dyn Transport>,
        request_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Self {
            base_url: connection.base_url()?,
            authorization: connection.credentials.as_ref().map(|c| c.authorization_header()),
            request_timeout,
            transport,
        })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn build_request<E: Endpoint>(&self, endpoint: &E) -> Result<HttpRequest, ClientError> {
        let url = self.base_url.join(&endpoint.relative_url())?;
        let mut request = HttpRequest::get(url.as_str());
        if let Some(authorization) = &self.authorization {
            request.headers.push(("Authorization".to_string(), authorization.clone()));
        }
        Ok(request)
    }

    pub(crate) async fn execute<E: Endpoint>(
        &self,
        endpoint: &E,
        cancel: &CancellationToken,
    ) -> Result<Outcome<E::Output>, ClientError> {
        let request = self.build_request(endpoint)?;
        let span = tracing::debug_span!("sonarqube_request", endpoint = E::NAME, url = %request.url);

        async move {
            if cancel.is_cancelled() {
                debug!("cancelled before sending");
                return Err(ClientError::Cancelled(CancelReason::Caller));
            }

            let started = Instant::now();
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("cancelled by caller");
                    return Err(ClientError::Cancelled(CancelReason::Caller));
                }
                _ = tokio::time::sleep(self.request_timeout) => {
                    warn!(timeout = ?self.request_timeout, "request timed out");
                    return Err(ClientError::Cancelled(CancelReason::Timeout(self.request_timeout)));
                }
                sent = self.transport.send(request) => sent.map_err(|fault| {
                    warn!(error = %fault, "transport fault");
                    ClientError::Transport(fault)
                })?,
            };

            let status = response.status;
            debug!(status, elapsed = ?started.elapsed(), "response received");

            if !response.is_success() {
                warn!(status, "server returned a non-success status");
                return Ok(Outcome::failure(status));
            }

            let value = endpoint.decode(&response.body).map_err(|source| ClientError::Decode {
                endpoint: E::NAME,
                status,
                source,
            })?;
            Ok(Outcome::success(value, status))
        }
        .instrument(span)
        .await
    }
}

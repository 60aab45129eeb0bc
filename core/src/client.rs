//! Public client for the SonarQube web API.
//!
//! # Design
//! `SonarQubeClient` has one method per endpoint. Each method only picks its
//! request descriptor; URL building, sending, status classification, and
//! decoding all go through the shared `Executor`. The client owns its
//! transport exclusively and releases it exactly once, on `close` or on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::connection::ConnectionInfo;
use crate::endpoint::{
    ComponentRequest, Endpoint, IssuesRequest, NotificationsRequest, OrganizationRequest, PluginsRequest,
    ProjectsRequest, PropertiesRequest, QualityProfileChangeLogRequest, QualityProfileRequest,
    RoslynExportProfileRequest, ValidateCredentialsRequest, VersionRequest,
};
use crate::error::{ClientError, ConfigError};
use crate::executor::Executor;
use crate::http::{HttpRequest, Transport};
use crate::issues::ServerIssue;
use crate::outcome::Outcome;
use crate::transport::ReqwestTransport;
use crate::types::{
    ComponentResponse, CredentialsResponse, NotificationEvent, OrganizationResponse, PluginResponse,
    ProjectResponse, PropertyResponse, QualityProfileChangeLogResponse, QualityProfileResponse,
    RoslynExportProfileResponse, VersionResponse,
};

/// Typed client for one SonarQube server.
///
/// Calls are independent and may run concurrently from shared references.
/// Calls made after `close` fail with `ClientError::Closed`; a call already
/// in flight when `close` runs has undefined outcome.
pub struct SonarQubeClient {
    executor: Executor,
    closed: AtomicBool,
}

impl SonarQubeClient {
    /// Takes ownership of `transport`; it is released when this client
    /// closes and never shared with another client.
    ///
    /// Fails immediately on a zero `request_timeout` or a server URL that
    /// cannot serve as a base address.
    pub fn new(
        connection: ConnectionInfo,
        transport: impl Transport + 'static,
        request_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let executor = Executor::new(&connection, Box::new(transport), request_timeout)?;
        debug!(server = %executor.base_url(), timeout = ?request_timeout, "created SonarQube client");
        Ok(Self {
            executor,
            closed: AtomicBool::new(false),
        })
    }

    /// Client backed by a fresh `ReqwestTransport`.
    pub fn with_reqwest(connection: ConnectionInfo, request_timeout: Duration) -> Result<Self, ConfigError> {
        Self::new(connection, ReqwestTransport::new()?, request_timeout)
    }

    pub fn server_url(&self) -> &Url {
        self.executor.base_url()
    }

    pub fn request_timeout(&self) -> Duration {
        self.executor.request_timeout()
    }

    /// The request a call to `endpoint` would send, without sending it.
    pub fn build_request<E: Endpoint>(&self, endpoint: &E) -> Result<HttpRequest, ClientError> {
        self.executor.build_request(endpoint)
    }

    /// Releases the transport. Only the first call has an effect.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(server = %self.executor.base_url(), "releasing transport");
            self.executor.transport().release();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Runs any endpoint through the shared executor.
    pub async fn call<E: Endpoint>(
        &self,
        endpoint: &E,
        cancel: &CancellationToken,
    ) -> Result<Outcome<E::Output>, ClientError> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        self.executor.execute(endpoint, cancel).await
    }

    pub async fn get_components_search_projects(
        &self,
        request: &ComponentRequest,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<ComponentResponse>>, ClientError> {
        self.call(request, cancel).await
    }

    pub async fn get_issues(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<ServerIssue>>, ClientError> {
        let request = IssuesRequest { key: key.to_string() };
        self.call(&request, cancel).await
    }

    pub async fn get_organizations(
        &self,
        request: &OrganizationRequest,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<OrganizationResponse>>, ClientError> {
        self.call(request, cancel).await
    }

    pub async fn get_plugins(&self, cancel: &CancellationToken) -> Result<Outcome<Vec<PluginResponse>>, ClientError> {
        self.call(&PluginsRequest, cancel).await
    }

    pub async fn get_projects(&self, cancel: &CancellationToken) -> Result<Outcome<Vec<ProjectResponse>>, ClientError> {
        self.call(&ProjectsRequest, cancel).await
    }

    pub async fn get_properties(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<PropertyResponse>>, ClientError> {
        self.call(&PropertiesRequest, cancel).await
    }

    pub async fn get_quality_profile_change_log(
        &self,
        request: &QualityProfileChangeLogRequest,
        cancel: &CancellationToken,
    ) -> Result<Outcome<QualityProfileChangeLogResponse>, ClientError> {
        self.call(request, cancel).await
    }

    pub async fn get_quality_profiles(
        &self,
        request: &QualityProfileRequest,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<QualityProfileResponse>>, ClientError> {
        self.call(request, cancel).await
    }

    pub async fn get_roslyn_export_profile(
        &self,
        request: &RoslynExportProfileRequest,
        cancel: &CancellationToken,
    ) -> Result<Outcome<RoslynExportProfileResponse>, ClientError> {
        self.call(request, cancel).await
    }

    pub async fn get_version(&self, cancel: &CancellationToken) -> Result<Outcome<VersionResponse>, ClientError> {
        self.call(&VersionRequest, cancel).await
    }

    pub async fn validate_credentials(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Outcome<CredentialsResponse>, ClientError> {
        self.call(&ValidateCredentialsRequest, cancel).await
    }

    pub async fn get_notification_events(
        &self,
        request: &NotificationsRequest,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<NotificationEvent>>, ClientError> {
        self.call(request, cancel).await
    }

    /// Convenience over `get_notification_events` for a single project.
    pub async fn get_notification_events_since(
        &self,
        project_key: &str,
        since: DateTime<FixedOffset>,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<NotificationEvent>>, ClientError> {
        let request = NotificationsRequest {
            project_key: project_key.to_string(),
            events_since: since,
        };
        self.call(&request, cancel).await
    }
}

impl Drop for SonarQubeClient {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SonarQubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SonarQubeClient")
            .field("server_url", self.executor.base_url())
            .field("request_timeout", &self.executor.request_timeout())
            .field("closed", &self.is_closed())
            .finish()
    }
}

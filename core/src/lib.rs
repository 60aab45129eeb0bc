//! Typed async client core for the SonarQube web API.
//!
//! # Overview
//! Turns typed request descriptors into GET requests against a configured
//! server, runs them under a combined caller-cancellation and timeout
//! policy, and maps the response into an `Outcome<T>`. Non-success statuses
//! are values (`Outcome::failure`), not errors.
//!
//! # Design
//! - `endpoint` holds one descriptor per endpoint; each knows its relative
//!   URL and how to decode its body.
//! - `executor` is the one place that sends, classifies, and decodes.
//! - `http::Transport` is the I/O seam. `ReqwestTransport` is the production
//!   implementation; tests plug in their own.
//! - Response models in `types` are defined independently of the mock
//!   server; end-to-end tests catch schema drift.

pub mod client;
pub mod connection;
mod decode;
pub mod endpoint;
pub mod error;
mod executor;
pub mod http;
pub mod issues;
pub mod outcome;
pub mod query;
pub mod transport;
pub mod types;

pub use client::SonarQubeClient;
pub use connection::{ConnectionInfo, Credentials};
pub use endpoint::{
    ComponentRequest, Endpoint, IssuesRequest, NotificationsRequest, OrganizationRequest, PluginsRequest,
    ProjectsRequest, PropertiesRequest, QualityProfileChangeLogRequest, QualityProfileRequest,
    RoslynExportProfileRequest, ValidateCredentialsRequest, VersionRequest,
};
pub use error::{CancelReason, ClientError, ConfigError, DecodeError};
pub use http::{BoxError, HttpRequest, HttpResponse, Transport};
pub use issues::{ServerIssue, Severity};
pub use outcome::Outcome;
pub use transport::ReqwestTransport;
pub use types::{
    ChangeLogEvent, ComponentResponse, CredentialsResponse, NotificationEvent, OrganizationResponse,
    PluginResponse, ProjectResponse, PropertyResponse, QualityProfileChangeLogResponse, QualityProfileResponse,
    RoslynExportProfileResponse, VersionResponse,
};
pub use tokio_util::sync::CancellationToken;

//! Request descriptors and their endpoint contracts.
//!
//! # Design
//! Each descriptor implements `Endpoint`, which pairs the relative URL it
//! builds with the decoder for the body the server returns. The executor is
//! generic over `Endpoint`, so adding an endpoint means adding a descriptor
//! and nothing else. The trait is sealed: the set of endpoints is closed.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::decode;
use crate::error::DecodeError;
use crate::issues::{self, ServerIssue};
use crate::query::UrlBuilder;
use crate::types::{
    ComponentResponse, CredentialsResponse, NotificationEvent, OrganizationResponse, PluginResponse,
    ProjectResponse, PropertyResponse, QualityProfileChangeLogResponse, QualityProfileResponse,
    RoslynExportProfileResponse, VersionResponse,
};

mod sealed {
    pub trait Sealed {}
}

/// A server endpoint: how to address it and how to read its answer.
pub trait Endpoint: sealed::Sealed {
    type Output: Default;

    /// Short name used in logs and errors.
    const NAME: &'static str;

    /// Path and query relative to the server base address.
    fn relative_url(&self) -> String;

    fn decode(&self, body: &[u8]) -> Result<Self::Output, DecodeError>;
}

macro_rules! endpoint {
    ($descriptor:ty, $name:literal, $output:ty, |$self_:ident| $url:expr, |$body:ident| $decode:expr) => {
        impl sealed::Sealed for $descriptor {}

        impl Endpoint for $descriptor {
            type Output = $output;
            const NAME: &'static str = $name;

            fn relative_url(&$self_) -> String {
                $url
            }

            fn decode(&self, $body: &[u8]) -> Result<Self::Output, DecodeError> {
                $decode
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRequest {
    #[serde(default)]
    pub organization_key: Option<String>,
    pub page: i32,
    pub page_size: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesRequest {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRequest {
    pub page: i32,
    pub page_size: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PluginsRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectsRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertiesRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfileChangeLogRequest {
    pub quality_profile_key: String,
    pub page_size: i32,
}

/// Profiles bound to `project_key`, or the server defaults when it is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualityProfileRequest {
    #[serde(default)]
    pub project_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoslynExportProfileRequest {
    pub quality_profile_name: String,
    pub language_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidateCredentialsRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsRequest {
    pub project_key: String,
    pub events_since: DateTime<FixedOffset>,
}

endpoint!(
    ComponentRequest,
    "search_projects",
    Vec<ComponentResponse>,
    |self| UrlBuilder::new("api/components/search_projects")
        .param("p", self.page)
        .param("ps", self.page_size)
        .optional("organization", self.organization_key.as_deref())
        .param("asc", true)
        .build(),
    |body| decode::json_field(body, "components")
);

endpoint!(
    IssuesRequest,
    "issues",
    Vec<ServerIssue>,
    |self| UrlBuilder::new("batch/issues").param("key", &self.key).build(),
    |body| Ok(issues::decode_stream(body)?)
);

endpoint!(
    OrganizationRequest,
    "organizations",
    Vec<OrganizationResponse>,
    |self| UrlBuilder::new("api/organizations/search")
        .param("p", self.page)
        .param("ps", self.page_size)
        .build(),
    |body| decode::json_field(body, "organizations")
);

endpoint!(
    PluginsRequest,
    "installed_plugins",
    Vec<PluginResponse>,
    |self| UrlBuilder::new("api/updatecenter/installed_plugins").build(),
    |body| decode::json(body)
);

endpoint!(
    ProjectsRequest,
    "projects",
    Vec<ProjectResponse>,
    |self| UrlBuilder::new("api/projects/index").build(),
    |body| decode::json(body)
);

endpoint!(
    PropertiesRequest,
    "properties",
    Vec<PropertyResponse>,
    |self| UrlBuilder::new("api/properties/").build(),
    |body| decode::json(body)
);

endpoint!(
    QualityProfileChangeLogRequest,
    "quality_profile_changelog",
    QualityProfileChangeLogResponse,
    |self| UrlBuilder::new("api/qualityprofiles/changelog")
        .param("profileKey", &self.quality_profile_key)
        .param("ps", self.page_size)
        .build(),
    |body| decode::json(body)
);

endpoint!(
    QualityProfileRequest,
    "quality_profiles",
    Vec<QualityProfileResponse>,
    |self| {
        let url = UrlBuilder::new("api/qualityprofiles/search");
        let url = match &self.project_key {
            Some(project_key) => url.param("projectKey", project_key),
            None => url.param("defaults", true),
        };
        url.build()
    },
    |body| decode::json_field(body, "profiles")
);

endpoint!(
    RoslynExportProfileRequest,
    "roslyn_export_profile",
    RoslynExportProfileResponse,
    |self| UrlBuilder::new("api/qualityprofiles/export")
        .param("language", &self.language_key)
        .param("name", &self.quality_profile_name)
        .param("exporterKey", format!("roslyn-{}", self.language_key))
        .build(),
    |body| Ok(RoslynExportProfileResponse { xml: decode::xml(body)? })
);

endpoint!(
    VersionRequest,
    "server_version",
    VersionResponse,
    |self| UrlBuilder::new("api/server/version").build(),
    |body| Ok(VersionResponse { version: decode::text(body)? })
);

endpoint!(
    ValidateCredentialsRequest,
    "validate_credentials",
    CredentialsResponse,
    |self| UrlBuilder::new("api/authentication/validate").build(),
    |body| decode::json(body)
);

endpoint!(
    NotificationsRequest,
    "notification_events",
    Vec<NotificationEvent>,
    |self| UrlBuilder::new("api/developers/search_events")
        .param("projects", &self.project_key)
        .date("from", &self.events_since)
        .build(),
    |body| decode::json_field(body, "events")
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn search_projects_url() {
        let request = ComponentRequest {
            organization_key: Some("org".to_string()),
            page: 42,
            page_size: 25,
        };
        assert_eq!(
            request.relative_url(),
            "api/components/search_projects?p=42&ps=25&organization=org&asc=true"
        );
    }

    #[test]
    fn search_projects_without_organization() {
        let request = ComponentRequest {
            organization_key: None,
            page: 1,
            page_size: 500,
        };
        assert_eq!(request.relative_url(), "api/components/search_projects?p=1&ps=500&asc=true");
    }

    #[test]
    fn organization_with_space_is_form_encoded() {
        let request = ComponentRequest {
            organization_key: Some("my org".to_string()),
            page: 1,
            page_size: 2,
        };
        assert_eq!(
            request.relative_url(),
            "api/components/search_projects?p=1&ps=2&organization=my+org&asc=true"
        );
    }

    #[test]
    fn negative_page_is_encoded_as_given() {
        let request = OrganizationRequest { page: -1, page_size: 0 };
        assert_eq!(request.relative_url(), "api/organizations/search?p=-1&ps=0");
    }

    #[test]
    fn quality_profiles_switch_shape_on_project_key() {
        let with_project = QualityProfileRequest {
            project_key: Some("project".to_string()),
        };
        assert_eq!(with_project.relative_url(), "api/qualityprofiles/search?projectKey=project");
        assert_eq!(
            QualityProfileRequest::default().relative_url(),
            "api/qualityprofiles/search?defaults=true"
        );
    }

    #[test]
    fn roslyn_exporter_key_follows_language() {
        let request = RoslynExportProfileRequest {
            quality_profile_name: "qp".to_string(),
            language_key: "vbnet".to_string(),
        };
        assert_eq!(
            request.relative_url(),
            "api/qualityprofiles/export?language=vbnet&name=qp&exporterKey=roslyn-vbnet"
        );
    }

    #[test]
    fn profile_name_is_encoded() {
        let request = RoslynExportProfileRequest {
            quality_profile_name: "Sonar way+".to_string(),
            language_key: "cs".to_string(),
        };
        assert_eq!(
            request.relative_url(),
            "api/qualityprofiles/export?language=cs&name=Sonar+way%2b&exporterKey=roslyn-cs"
        );
    }

    #[test]
    fn notifications_url_encodes_offset() {
        let request = NotificationsRequest {
            project_key: "project".to_string(),
            events_since: FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
                .unwrap(),
        };
        assert_eq!(
            request.relative_url(),
            "api/developers/search_events?projects=project&from=2000-01-01T00:00:00%2b0100"
        );
    }

    #[test]
    fn change_log_keeps_outer_object() {
        let request = QualityProfileChangeLogRequest {
            quality_profile_key: "qp".to_string(),
            page_size: 25,
        };
        assert_eq!(request.relative_url(), "api/qualityprofiles/changelog?profileKey=qp&ps=25");

        let log = request
            .decode(br#"{"total":1,"p":1,"ps":25,"events":[{"date":"2015-02-23T17:58:39+0100","action":"ACTIVATED","ruleKey":"squid:S2438"}]}"#)
            .unwrap();
        assert_eq!(log.total, 1);
        assert_eq!(log.page_size, 25);
        assert_eq!(log.events.len(), 1);
        assert_eq!(log.events[0].rule_key, "squid:S2438");
    }

    #[test]
    fn version_is_raw_text() {
        let version = VersionRequest.decode(b"6.3.0.1234").unwrap();
        assert_eq!(version.version, "6.3.0.1234");
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = PluginsRequest.decode(b"[{\"key\":").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}

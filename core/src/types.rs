//! Response models for the SonarQube web API.
//!
//! # Design
//! Field names follow the server's camelCase JSON; a few endpoints use
//! abbreviated keys (`k`, `nm`, `p`, `ps`) that are renamed here. Unknown
//! fields are ignored and missing optional fields take their default, so
//! newer servers that add fields keep decoding.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::query::sonar_date;

/// An entry of `api/components/search_projects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentResponse {
    pub organization: String,
    pub id: String,
    pub key: String,
    pub name: String,
    pub is_favorite: bool,
    pub tags: Vec<String>,
    pub visibility: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrganizationResponse {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PluginResponse {
    pub key: String,
    pub name: String,
    pub version: String,
}

/// An entry of `api/projects/index`, which uses abbreviated keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectResponse {
    pub id: String,
    #[serde(rename = "k")]
    pub key: String,
    #[serde(rename = "nm")]
    pub name: String,
    #[serde(rename = "sc")]
    pub scope: String,
    #[serde(rename = "qu")]
    pub qualifier: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PropertyResponse {
    pub key: String,
    pub value: String,
}

/// One page of a quality profile's change log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QualityProfileChangeLogResponse {
    pub total: u32,
    #[serde(rename = "p")]
    pub page: u32,
    #[serde(rename = "ps")]
    pub page_size: u32,
    pub events: Vec<ChangeLogEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeLogEvent {
    #[serde(deserialize_with = "sonar_date::option::deserialize")]
    pub date: Option<DateTime<FixedOffset>>,
    pub action: String,
    pub author_login: String,
    pub author_name: String,
    pub rule_key: String,
    pub rule_name: String,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityProfileResponse {
    pub key: String,
    pub name: String,
    pub language: String,
    pub language_name: String,
    pub is_inherited: bool,
    pub active_rule_count: u32,
    pub active_deprecated_rule_count: u32,
    pub is_default: bool,
    #[serde(deserialize_with = "sonar_date::option::deserialize")]
    pub rule_updated_at: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "sonar_date::option::deserialize")]
    pub last_used: Option<DateTime<FixedOffset>>,
}

/// The `RoslynExportProfile` XML document, kept verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoslynExportProfileResponse {
    pub xml: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialsResponse {
    #[serde(rename = "valid")]
    pub is_valid: bool,
}

/// A developer notification from `api/developers/search_events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationEvent {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub link: Option<Url>,
    #[serde(default)]
    pub project: String,
    #[serde(deserialize_with = "sonar_date::deserialize")]
    pub date: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn project_uses_abbreviated_keys() {
        let project: ProjectResponse = serde_json::from_str(
            r#"{"id":"5035","k":"org.jenkins-ci.plugins:sonar","nm":"Jenkins Sonar Plugin","sc":"PRJ","qu":"TRK"}"#,
        )
        .unwrap();
        assert_eq!(project.key, "org.jenkins-ci.plugins:sonar");
        assert_eq!(project.name, "Jenkins Sonar Plugin");
        assert_eq!(project.scope, "PRJ");
        assert_eq!(project.qualifier, "TRK");
    }

    #[test]
    fn component_ignores_unknown_and_defaults_missing_fields() {
        let component: ComponentResponse =
            serde_json::from_str(r#"{"key":"my_project","unexpected":42}"#).unwrap();
        assert_eq!(component.key, "my_project");
        assert!(!component.is_favorite);
        assert!(component.tags.is_empty());
    }

    #[test]
    fn quality_profile_dates_keep_their_offset() {
        let profile: QualityProfileResponse = serde_json::from_str(
            r#"{"key":"AU-TpxcA-iU5OvuD2FL3","isDefault":true,"activeRuleCount":37,"ruleUpdatedAt":"2016-12-22T19:10:03+0100"}"#,
        )
        .unwrap();
        let expected = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2016, 12, 22, 19, 10, 3)
            .unwrap();
        assert_eq!(profile.rule_updated_at, Some(expected));
        assert_eq!(profile.last_used, None);
        assert_eq!(profile.active_rule_count, 37);
        assert!(profile.is_default);
    }

    #[test]
    fn change_log_event_collects_params() {
        let event: ChangeLogEvent = serde_json::from_str(
            r#"{"date":"2015-02-23T17:58:39+0100","action":"ACTIVATED","params":{"severity":"CRITICAL"}}"#,
        )
        .unwrap();
        assert_eq!(event.action, "ACTIVATED");
        assert_eq!(event.params.get("severity").map(String::as_str), Some("CRITICAL"));
    }

    #[test]
    fn notification_requires_a_date() {
        let result: Result<NotificationEvent, _> = serde_json::from_str(r#"{"category":"QUALITY_GATE"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn credentials_read_the_valid_flag() {
        let credentials: CredentialsResponse = serde_json::from_str(r#"{"valid": true}"#).unwrap();
        assert!(credentials.is_valid);
    }
}

//! Server issues served by `batch/issues` as a protobuf stream.
//!
//! The body is a sequence of `ServerIssue` messages, each prefixed with its
//! varint-encoded length.

use prost::Message;

/// Severity as encoded by the scanner protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Severity {
    UnsetSeverity = 0,
    Info = 1,
    Minor = 2,
    Major = 3,
    Critical = 4,
    Blocker = 5,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ServerIssue {
    #[prost(string, optional, tag = "1")]
    pub key: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub module_key: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub path: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub rule_repository: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub rule_key: Option<String>,
    #[prost(int32, optional, tag = "6")]
    pub line: Option<i32>,
    #[prost(string, optional, tag = "7")]
    pub msg: Option<String>,
    #[prost(enumeration = "Severity", optional, tag = "8")]
    pub severity: Option<i32>,
    #[prost(bool, optional, tag = "9")]
    pub manual_severity: Option<bool>,
    #[prost(string, optional, tag = "10")]
    pub resolution: Option<String>,
    #[prost(string, optional, tag = "11")]
    pub status: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub checksum: Option<String>,
    #[prost(string, optional, tag = "13")]
    pub assignee_login: Option<String>,
    #[prost(int64, optional, tag = "14")]
    pub creation_date: Option<i64>,
    #[prost(string, optional, tag = "15")]
    pub r#type: Option<String>,
}

pub(crate) fn decode_stream(mut body: &[u8]) -> Result<Vec<ServerIssue>, prost::DecodeError> {
    let mut issues = Vec::new();
    while !body.is_empty() {
        issues.push(ServerIssue::decode_length_delimited(&mut body)?);
    }
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(key: &str, line: i32) -> ServerIssue {
        ServerIssue {
            key: Some(key.to_string()),
            rule_repository: Some("csharpsquid".to_string()),
            rule_key: Some("S121".to_string()),
            line: Some(line),
            severity: Some(Severity::Major as i32),
            ..Default::default()
        }
    }

    #[test]
    fn decodes_every_delimited_message() {
        let mut body = issue("AVg1", 10).encode_length_delimited_to_vec();
        body.extend(issue("AVg2", 20).encode_length_delimited_to_vec());

        let issues = decode_stream(&body).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].key(), "AVg1");
        assert_eq!(issues[1].line(), 20);
        assert_eq!(issues[1].severity(), Severity::Major);
    }

    #[test]
    fn empty_body_has_no_issues() {
        assert!(decode_stream(&[]).unwrap().is_empty());
    }

    #[test]
    fn truncated_message_is_an_error() {
        let body = issue("AVg1", 10).encode_length_delimited_to_vec();
        assert!(decode_stream(&body[..body.len() - 3]).is_err());
    }
}

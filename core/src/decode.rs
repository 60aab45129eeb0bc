//! Body decoding strategies shared by the endpoints.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// The whole body as one JSON value (object or bare array).
pub(crate) fn json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

/// One named member of a top-level JSON object, e.g. `{"components":[...]}`.
pub(crate) fn json_field<T: DeserializeOwned>(body: &[u8], field: &'static str) -> Result<T, DecodeError> {
    let mut root: Map<String, Value> = serde_json::from_slice(body)?;
    let value = root.remove(field).ok_or(DecodeError::MissingField(field))?;
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn text(body: &[u8]) -> Result<String, DecodeError> {
    Ok(std::str::from_utf8(body)?.to_string())
}

/// Accepts the body as an XML document without interpreting it.
pub(crate) fn xml(body: &[u8]) -> Result<String, DecodeError> {
    let document = text(body)?;
    let trimmed = document.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(DecodeError::NotXml("empty body"));
    }
    if !trimmed.starts_with('<') {
        return Err(DecodeError::NotXml("body does not start with an element or declaration"));
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_field_unwraps_named_array() {
        let names: Vec<Value> = json_field(br#"{"organizations":[{"key":"a"},{"key":"b"}],"paging":{}}"#, "organizations").unwrap();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn json_field_reports_missing_member() {
        let err = json_field::<Vec<Value>>(br#"{"other":[]}"#, "profiles").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("profiles")));
    }

    #[test]
    fn json_rejects_empty_body() {
        assert!(matches!(json::<Vec<Value>>(b""), Err(DecodeError::Json(_))));
    }

    #[test]
    fn xml_requires_a_document() {
        assert!(xml(b"<?xml version=\"1.0\"?><a/>").is_ok());
        assert!(matches!(xml(b"   "), Err(DecodeError::NotXml("empty body"))));
        assert!(matches!(xml(b"{\"a\":1}"), Err(DecodeError::NotXml(_))));
    }

    #[test]
    fn text_rejects_invalid_utf8() {
        assert!(matches!(text(&[0xff, 0xfe]), Err(DecodeError::Utf8(_))));
    }
}

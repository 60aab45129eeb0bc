//! Relative URL construction and the server's date format.
//!
//! Query values are form-encoded with lowercase hex escapes: `+` becomes
//! `%2b` and a space becomes `+`. `:` and `@` are legal in a query and stay
//! literal, which keeps dates readable on the wire. Parameter names are written verbatim and in
//! the order they are added.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// `yyyy-MM-ddTHH:mm:ss` followed by a numeric offset such as `+0100`.
pub const SONAR_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Everything but RFC 3986 unreserved characters, `:` and `@`. Space is
/// left through and rewritten to `+` by `encode_value`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'@');

#[derive(Debug)]
pub(crate) struct UrlBuilder {
    url: String,
    has_query: bool,
}

impl UrlBuilder {
    pub(crate) fn new(path: &str) -> Self {
        Self {
            url: path.to_string(),
            has_query: false,
        }
    }

    pub(crate) fn param(mut self, name: &str, value: impl Display) -> Self {
        self.url.push(if self.has_query { '&' } else { '?' });
        self.has_query = true;
        self.url.push_str(name);
        self.url.push('=');
        self.url.push_str(&encode_value(&value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub(crate) fn optional(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub(crate) fn date(self, name: &str, value: &DateTime<FixedOffset>) -> Self {
        self.param(name, format_date(value))
    }

    pub(crate) fn build(self) -> String {
        self.url
    }
}

pub fn format_date(value: &DateTime<FixedOffset>) -> String {
    value.format(SONAR_DATE_FORMAT).to_string()
}

pub fn encode_value(value: &str) -> String {
    let encoded = utf8_percent_encode(value, QUERY_VALUE).to_string();
    let mut out = String::with_capacity(encoded.len());
    let mut hex_left = 0;
    for c in encoded.chars() {
        if c == '%' {
            hex_left = 2;
            out.push(c);
        } else if hex_left > 0 {
            hex_left -= 1;
            out.push(c.to_ascii_lowercase());
        } else if c == ' ' {
            out.push('+');
        } else {
            out.push(c);
        }
    }
    out
}

/// Serde adapters for dates in `SONAR_DATE_FORMAT`.
pub(crate) mod sonar_date {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer};

    use super::SONAR_DATE_FORMAT;

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&raw, SONAR_DATE_FORMAT).map_err(de::Error::custom)
    }

    pub(crate) mod option {
        use super::*;

        pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => DateTime::parse_from_str(&raw, SONAR_DATE_FORMAT)
                    .map(Some)
                    .map_err(de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

//! Lenient timestamp parsing for task records.
//!
//! The service emits zone-less ISO-8601 local times
//! (`2024-05-01T12:30:45.123`); other deployments emit RFC 3339. Zone-less
//! values are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Parses either RFC 3339 or a zone-less ISO-8601 date-time.
///
/// # Errors
///
/// Returns a description of the rejected input when neither form matches.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
}

/// Serde adapter for a required timestamp.
pub mod required {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc};

    /// Serializes as RFC 3339.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339())
    }

    /// Deserializes RFC 3339 or zone-less ISO-8601.
    ///
    /// # Errors
    ///
    /// Fails when the string matches neither format.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for an optional timestamp; `null` and absence both map to `None`.
pub mod optional {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc};

    /// Serializes as RFC 3339 or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => s.serialize_some(&ts.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    /// Deserializes an optional RFC 3339 or zone-less ISO-8601 string.
    ///
    /// # Errors
    ///
    /// Fails when a present string matches neither format.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse("2024-05-01T20:30:45+08:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T12:30:45+00:00");
    }

    #[test]
    fn parses_zoneless_as_utc() {
        let ts = parse("2024-05-01T12:30:45.123").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 12:30:45");
    }

    #[test]
    fn rejects_garbage() {
        let err = parse("yesterday").unwrap_err();
        assert!(err.contains("yesterday"));
    }
}

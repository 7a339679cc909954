// Wire types for the client-count telemetry API.
//
// The service answers `GET /client-count/{location}/{session}` with
// `{ status, data: { clientCount: [...] } }`. A missing or non-array
// `data.clientCount` is an empty result, not an error.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── Session ─────────────────────────────────────────────────────────

/// Coarse time-of-day bucket the service groups samples under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Session {
    #[serde(rename = "pagi")]
    Morning,
    #[serde(rename = "siang")]
    Afternoon,
}

impl Session {
    pub const ALL: [Self; 2] = [Self::Morning, Self::Afternoon];

    /// Identifier used in request paths and records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "pagi",
            Self::Afternoon => "siang",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown session '{0}' (expected pagi/morning or siang/afternoon)")]
pub struct ParseSessionError(pub String);

impl FromStr for Session {
    type Err = ParseSessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pagi" | "morning" => Ok(Self::Morning),
            "siang" | "afternoon" => Ok(Self::Afternoon),
            _ => Err(ParseSessionError(s.to_owned())),
        }
    }
}

// ── Record ──────────────────────────────────────────────────────────

/// One telemetry sample. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCountRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Site identifier (`kawasan` on the wire).
    #[serde(rename = "kawasan", alias = "location")]
    pub location: String,
    /// Raw session string; usually `pagi` or `siang`.
    pub session: String,
    pub dhcp: u64,
    pub dynamic: u64,
    pub hotspot: u64,
    pub guest: u64,
    /// Server-assigned; the record's ordering key.
    pub created_at: DateTime<Utc>,
}

impl ClientCountRecord {
    /// The session as a known bucket, if it is one.
    pub fn session(&self) -> Option<Session> {
        self.session.parse().ok()
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// ── Response envelope ───────────────────────────────────────────────

/// Decoded response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientCountResponse {
    pub status: Option<String>,
    pub records: Vec<ClientCountRecord>,
}

impl ClientCountResponse {
    /// Decode a response body.
    ///
    /// Invalid JSON and records of the wrong shape are errors; an absent
    /// or non-array `data.clientCount` yields no records.
    pub fn from_body(body: &str) -> Result<Self, Error> {
        let mut value: Value = serde_json::from_str(body).map_err(|e| deser_error(&e, body))?;

        let status = value
            .get("status")
            .and_then(Value::as_str)
            .map(String::from);

        let records = match value.pointer_mut("/data/clientCount").map(Value::take) {
            Some(items @ Value::Array(_)) => {
                serde_json::from_value(items).map_err(|e| deser_error(&e, body))?
            }
            _ => Vec::new(),
        };

        Ok(Self { status, records })
    }
}

fn deser_error(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "66f1",
            "kawasan": "gatsu",
            "session": "pagi",
            "dhcp": 120,
            "dynamic": 40,
            "hotspot": 12,
            "guest": 3,
            "createdAt": "2024-06-15T01:30:00.000Z"
        })
    }

    #[test]
    fn record_decodes_wire_names() {
        let record: ClientCountRecord = serde_json::from_value(sample()).unwrap();
        assert_eq!(record.location, "gatsu");
        assert_eq!(record.session(), Some(Session::Morning));
        assert_eq!(record.dhcp, 120);
        assert_eq!(record.created_at.timestamp_millis(), 1_718_415_000_000);
    }

    #[test]
    fn numeric_id_is_kept_as_string() {
        let mut raw = sample();
        raw["id"] = json!(42);
        let record: ClientCountRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id, "42");
    }

    #[test]
    fn unknown_session_string_survives() {
        let mut raw = sample();
        raw["session"] = json!("malam");
        let record: ClientCountRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.session, "malam");
        assert_eq!(record.session(), None);
    }

    #[test]
    fn body_without_client_count_is_empty() {
        let resp = ClientCountResponse::from_body(r#"{"status":"ok","data":{}}"#).unwrap();
        assert_eq!(resp.status.as_deref(), Some("ok"));
        assert!(resp.records.is_empty());

        let resp = ClientCountResponse::from_body(r#"{"status":"ok"}"#).unwrap();
        assert!(resp.records.is_empty());

        let resp =
            ClientCountResponse::from_body(r#"{"data":{"clientCount":"nope"}}"#).unwrap();
        assert!(resp.records.is_empty());
    }

    #[test]
    fn body_with_records() {
        let body = json!({ "status": "ok", "data": { "clientCount": [sample()] } }).to_string();
        let resp = ClientCountResponse::from_body(&body).unwrap();
        assert_eq!(resp.records.len(), 1);
        assert_eq!(resp.records[0].id, "66f1");
    }

    #[test]
    fn invalid_json_is_deserialization_error() {
        let err = ClientCountResponse::from_body("<html>").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn session_parses_both_vocabularies() {
        assert_eq!("pagi".parse::<Session>().unwrap(), Session::Morning);
        assert_eq!("Afternoon".parse::<Session>().unwrap(), Session::Afternoon);
        assert!("evening".parse::<Session>().is_err());
        assert_eq!(Session::Afternoon.to_string(), "siang");
    }
}

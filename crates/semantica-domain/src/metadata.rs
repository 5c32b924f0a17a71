//! Free-form metadata payloads and timestamps

use chrono::{SecondsFormat, Utc};

/// Free-form payload attached to entries and citations.
///
/// A JSON object: values are a tagged union of string, number, bool, null,
/// list and nested map. The SQLite backend stores it as JSON text.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Current UTC time as an RFC 3339 (ISO-8601) string with microseconds
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

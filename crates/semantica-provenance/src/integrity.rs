//! Checksums for tamper detection
//!
//! An entry checksum is the SHA-256 hex digest of the undelimited
//! concatenation of `entity_id`, `entity_type`, `activity_id`,
//! `source_document` (empty when absent), `timestamp` and `confidence`.
//!
//! Only those identity fields are covered. Two entries differing solely in
//! metadata, parent link or `used_entities` share a checksum.

use semantica_domain::{Metadata, ProvenanceEntry};
use sha2::{Digest, Sha256};

/// Compute the checksum of an entry's identity fields
pub fn compute_checksum(entry: &ProvenanceEntry) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entry.entity_id.as_bytes());
    hasher.update(entry.entity_type.as_bytes());
    hasher.update(entry.activity_id.as_bytes());
    hasher.update(entry.source_document.as_deref().unwrap_or("").as_bytes());
    hasher.update(entry.timestamp.as_bytes());
    hasher.update(format_confidence(entry.confidence).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Recompute and compare an entry's checksum
///
/// Compares against `expected` when given, else against `entry.checksum`.
/// Returns `false` when there is nothing to compare against.
pub fn verify_checksum(entry: &ProvenanceEntry, expected: Option<&str>) -> bool {
    match expected.or(entry.checksum.as_deref()) {
        Some(expected) => compute_checksum(entry) == expected,
        None => false,
    }
}

/// SHA-256 hex digest of a string
pub fn compute_data_checksum(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a string against a digest from [`compute_data_checksum`]
pub fn verify_data_checksum(data: &str, expected: &str) -> bool {
    compute_data_checksum(data) == expected
}

/// SHA-256 hex digest of a metadata map
///
/// Keys are sorted; values are rendered as compact JSON. Nested maps are not
/// re-canonicalized beyond what that rendering gives.
pub fn compute_dict_checksum(data: &Metadata) -> String {
    let mut items: Vec<(&String, &serde_json::Value)> = data.iter().collect();
    items.sort_by(|a, b| a.0.cmp(b.0));

    let rendered = items
        .iter()
        .map(|(key, value)| format!("({:?}, {})", key, value))
        .collect::<Vec<_>>()
        .join(", ");

    compute_data_checksum(&format!("[{}]", rendered))
}

/// Check a metadata map against a digest from [`compute_dict_checksum`]
pub fn verify_dict_checksum(data: &Metadata, expected: &str) -> bool {
    compute_dict_checksum(data) == expected
}

/// Render a confidence the way a decimal float literal reads: `1.0`, `0.95`
fn format_confidence(confidence: f64) -> String {
    if confidence.is_finite() && confidence.fract() == 0.0 && confidence.abs() < 1e16 {
        format!("{:.1}", confidence)
    } else {
        confidence.to_string()
    }
}

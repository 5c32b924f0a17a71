//! Identifier generation for artifacts that arrive without one

/// Generate a fresh entity identifier with the given prefix.
///
/// The suffix is a UUIDv7, so identifiers generated in sequence sort
/// chronologically.
///
/// # Examples
///
/// ```
/// use semantica_domain::generate_entity_id;
///
/// let id = generate_entity_id("chunk");
/// assert!(id.starts_with("chunk_"));
/// ```
pub fn generate_entity_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::now_v7().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_entity_id("entity");
        let b = generate_entity_id("entity");
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_ids_are_chronological() {
        let a = generate_entity_id("x");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = generate_entity_id("x");
        assert!(a < b, "Earlier UUIDv7 suffix should sort first");
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_entity_id("doc");
        // prefix + '_' + 32 hex chars
        assert_eq!(id.len(), "doc_".len() + 32);
        assert!(id["doc_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}

//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use semantica_provenance::ProvenanceManager;

/// Execute the verify command.
///
/// Fails with `IntegrityFailed` when any checked entry does not verify, so
/// the exit status can gate scripts.
pub fn execute_verify(
    args: VerifyArgs,
    manager: &ProvenanceManager,
    formatter: &Formatter,
) -> Result<String> {
    match args.id {
        Some(id) => match manager.verify_entry(&id)? {
            None => Err(CliError::NotFound(id)),
            Some(true) => Ok(formatter.success(&format!("{} verified", id))),
            Some(false) => {
                eprintln!("{}", formatter.error(&format!("checksum mismatch: {}", id)));
                Err(CliError::IntegrityFailed(1))
            }
        },
        None => {
            let report = manager.verify_all()?;
            let output = formatter.format_integrity(&report)?;
            if report.is_clean() {
                Ok(output)
            } else {
                eprintln!("{}", output);
                Err(CliError::IntegrityFailed(
                    report.invalid.len() + report.missing_checksum.len(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use semantica_domain::{ProvenanceEntry, ProvenanceStorage};
    use semantica_provenance::{ProvenanceConfig, TrackOptions};
    use semantica_store::InMemoryStorage;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_clean_store_verifies() {
        let mut manager = ProvenanceManager::in_memory();
        manager.track_entity("e1", "doc", TrackOptions::new()).unwrap();

        let all = execute_verify(VerifyArgs { id: None }, &manager, &formatter()).unwrap();
        assert!(all.contains("1 entries verified"));

        let one = execute_verify(VerifyArgs { id: Some("e1".into()) }, &manager, &formatter());
        assert_eq!(one.unwrap(), "✓ e1 verified");
    }

    #[test]
    fn test_tampered_entry_fails() {
        let mut storage = InMemoryStorage::new();
        let mut forged = ProvenanceEntry::new("forged", "entity", "x");
        forged.checksum = Some("f".repeat(64));
        storage.store(&forged).unwrap();
        let manager = ProvenanceManager::with_storage(storage, ProvenanceConfig::default());

        let result = execute_verify(VerifyArgs { id: None }, &manager, &formatter());
        assert!(matches!(result, Err(CliError::IntegrityFailed(1))));

        let result = execute_verify(VerifyArgs { id: Some("forged".into()) }, &manager, &formatter());
        assert!(matches!(result, Err(CliError::IntegrityFailed(1))));
    }

    #[test]
    fn test_unknown_id() {
        let manager = ProvenanceManager::in_memory();
        let result = execute_verify(VerifyArgs { id: Some("x".into()) }, &manager, &formatter());
        assert!(matches!(result, Err(CliError::NotFound(_))));
    }
}

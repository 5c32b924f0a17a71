//! Track command implementation.

use crate::cli::TrackArgs;
use crate::error::Result;
use crate::output::Formatter;
use semantica_provenance::{ProvenanceManager, TrackOptions};

/// Execute the track command.
pub fn execute_track(
    args: TrackArgs,
    manager: &mut ProvenanceManager,
    formatter: &Formatter,
) -> Result<String> {
    let mut options = TrackOptions::new()
        .entity_type(args.entity_type)
        .confidence(args.confidence);
    options.activity_id = args.activity;
    options.parent_entity_id = args.parent;
    options.used_entities = args.used;
    options.source_location = args.location;
    options.source_quote = args.quote;

    let entry = manager.track_entity(&args.id, &args.source, options)?;
    Ok(formatter.success(&format!(
        "Tracked {} ({})",
        entry.entity_id, entry.entity_type
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;

    fn args(id: &str, source: &str) -> TrackArgs {
        TrackArgs {
            id: id.to_string(),
            source: source.to_string(),
            entity_type: "document".to_string(),
            activity: Some("manual_entry".to_string()),
            parent: None,
            used: vec![],
            location: Some("page 2".to_string()),
            quote: None,
            confidence: 0.8,
        }
    }

    #[test]
    fn test_track_records_entry() {
        let mut manager = ProvenanceManager::in_memory();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let output = execute_track(args("doc_9", "scan.pdf"), &mut manager, &formatter).unwrap();
        assert_eq!(output, "✓ Tracked doc_9 (document)");

        let entry = manager.get_provenance("doc_9").unwrap().unwrap();
        assert_eq!(entry.activity_id, "manual_entry");
        assert_eq!(entry.source_location.as_deref(), Some("page 2"));
        assert_eq!(entry.confidence, 0.8);
    }

    #[test]
    fn test_track_rejects_empty_source() {
        let mut manager = ProvenanceManager::in_memory();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let result = execute_track(args("doc_9", ""), &mut manager, &formatter);
        assert!(matches!(result, Err(CliError::Provenance(_))));
    }
}

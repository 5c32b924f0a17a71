//! Read-only commands: show, list, lineage and stats.

use crate::cli::{LineageArgs, ListArgs, ShowArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use semantica_provenance::ProvenanceManager;

/// Execute the show command.
pub fn execute_show(
    args: ShowArgs,
    manager: &ProvenanceManager,
    formatter: &Formatter,
) -> Result<String> {
    let entry = manager
        .get_provenance(&args.id)?
        .ok_or(CliError::NotFound(args.id))?;
    formatter.format_entry(&entry)
}

/// Execute the list command.
///
/// Entries are sorted by timestamp, then id.
pub fn execute_list(
    args: ListArgs,
    manager: &ProvenanceManager,
    formatter: &Formatter,
) -> Result<String> {
    let mut entries = manager.list_entries(args.entity_type.as_deref())?;
    entries.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    formatter.format_entries(&entries)
}

/// Execute the lineage command.
///
/// An unknown id prints an empty report rather than failing.
pub fn execute_lineage(
    args: LineageArgs,
    manager: &ProvenanceManager,
    formatter: &Formatter,
) -> Result<String> {
    let report = manager.get_lineage(&args.id)?;
    formatter.format_lineage(&report)
}

/// Execute the stats command.
pub fn execute_stats(manager: &ProvenanceManager, formatter: &Formatter) -> Result<String> {
    let stats = manager.get_statistics()?;
    formatter.format_statistics(&stats)
}

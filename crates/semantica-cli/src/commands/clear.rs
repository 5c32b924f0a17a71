//! Clear command implementation.

use crate::cli::ClearArgs;
use crate::error::Result;
use crate::output::Formatter;
use semantica_provenance::ProvenanceManager;
use std::io::{self, BufRead, Write};

/// Execute the clear command.
///
/// Without `--yes` the user is asked to confirm on stdin.
pub fn execute_clear(
    args: ClearArgs,
    manager: &mut ProvenanceManager,
    formatter: &Formatter,
) -> Result<String> {
    if !args.yes {
        let count = manager.get_statistics()?.total_entries;
        print!("About to delete {} provenance entr(ies). Continue? [y/N] ", count);
        io::stdout().flush()?;

        if !confirm(io::stdin().lock())? {
            return Ok(formatter.info("Operation cancelled"));
        }
    }

    let removed = manager.clear()?;
    Ok(formatter.success(&format!("Deleted {} entr(ies)", removed)))
}

fn confirm(mut input: impl BufRead) -> Result<bool> {
    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use semantica_provenance::TrackOptions;

    #[test]
    fn test_clear_with_yes() {
        let mut manager = ProvenanceManager::in_memory();
        manager.track_entity("a", "s", TrackOptions::new()).unwrap();
        manager.track_entity("b", "s", TrackOptions::new()).unwrap();

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = execute_clear(ClearArgs { yes: true }, &mut manager, &formatter).unwrap();
        assert_eq!(output, "✓ Deleted 2 entr(ies)");
        assert_eq!(manager.get_statistics().unwrap().total_entries, 0);
    }

    #[test]
    fn test_confirm() {
        assert!(confirm("y\n".as_bytes()).unwrap());
        assert!(confirm(" Y \n".as_bytes()).unwrap());
        assert!(!confirm("\n".as_bytes()).unwrap());
        assert!(!confirm("yes\n".as_bytes()).unwrap());
    }
}

//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use semantica_domain::ProvenanceEntry;
use semantica_provenance::{IntegrityReport, LineageReport, ProvenanceStatistics};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of entries.
    pub fn format_entries(&self, entries: &[ProvenanceEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
            OutputFormat::Quiet => Ok(ids(entries)),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("No entries found.", "yellow"));
                }
                Ok(entries_table(entries))
            }
        }
    }

    /// Format a single entry with every field.
    pub fn format_entry(&self, entry: &ProvenanceEntry) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entry)?),
            OutputFormat::Quiet => Ok(entry.entity_id.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (field, value) in entry_fields(entry) {
                    builder.push_record([field.to_string(), value]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format a lineage report.
    pub fn format_lineage(&self, report: &LineageReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(ids(&report.lineage_chain)),
            OutputFormat::Table => {
                if report.is_empty() {
                    return Ok(self.colorize("No lineage found.", "yellow"));
                }

                let mut out = self.colorize(
                    &format!("Lineage of {} ({} entries)", report.entity_id, report.depth),
                    "cyan",
                );
                out.push('\n');
                out.push_str(&entries_table(&report.lineage_chain));
                out.push_str(&format!(
                    "\nSources:    {}\nActivities: {}\nAgents:     {}",
                    report.source_documents.join(", "),
                    report.activities.join(", "),
                    report.agents.join(", "),
                ));
                if let Some(min) = report.min_confidence {
                    out.push_str(&format!("\nWeakest confidence: {:.2}", min));
                }
                Ok(out)
            }
        }
    }

    /// Format store statistics.
    pub fn format_statistics(&self, stats: &ProvenanceStatistics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
            OutputFormat::Quiet => Ok(stats.total_entries.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value"]);
                builder.push_record(["Total entries".to_string(), stats.total_entries.to_string()]);
                builder.push_record([
                    "Source documents".to_string(),
                    stats.source_documents.to_string(),
                ]);
                builder.push_record([
                    "Average confidence".to_string(),
                    format!("{:.3}", stats.average_confidence),
                ]);
                for (entity_type, count) in &stats.entity_types {
                    builder.push_record([format!("type: {}", entity_type), count.to_string()]);
                }
                for (activity, count) in &stats.activities {
                    builder.push_record([format!("activity: {}", activity), count.to_string()]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format an integrity report.
    pub fn format_integrity(&self, report: &IntegrityReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report
                .invalid
                .iter()
                .chain(&report.missing_checksum)
                .cloned()
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut lines = Vec::new();
                if report.is_clean() {
                    lines.push(self.success(&format!("{} entries verified", report.checked)));
                } else {
                    lines.push(self.warning(&format!(
                        "{} of {} entries verified",
                        report.valid, report.checked
                    )));
                }
                for id in &report.invalid {
                    lines.push(self.error(&format!("checksum mismatch: {}", id)));
                }
                for id in &report.missing_checksum {
                    lines.push(self.warning(&format!("no checksum: {}", id)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn ids(entries: &[ProvenanceEntry]) -> String {
    entries
        .iter()
        .map(|e| e.entity_id.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn entries_table(entries: &[ProvenanceEntry]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Type", "Activity", "Source", "Parent", "Confidence"]);

    for entry in entries {
        builder.push_record([
            entry.entity_id.clone(),
            entry.entity_type.clone(),
            entry.activity_id.clone(),
            entry.source_document.clone().unwrap_or_default(),
            entry.parent_entity_id.clone().unwrap_or_default(),
            format!("{:.2}", entry.confidence),
        ]);
    }

    styled(builder)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn entry_fields(entry: &ProvenanceEntry) -> Vec<(&'static str, String)> {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();
    let mut fields = vec![
        ("entity_id", entry.entity_id.clone()),
        ("entity_type", entry.entity_type.clone()),
        ("activity_id", entry.activity_id.clone()),
        ("agent_id", entry.agent_id.clone()),
        ("source_document", opt(&entry.source_document)),
        ("source_location", opt(&entry.source_location)),
        ("source_quote", opt(&entry.source_quote)),
        ("timestamp", entry.timestamp.clone()),
        ("first_seen", opt(&entry.first_seen)),
        ("last_updated", opt(&entry.last_updated)),
        ("confidence", entry.confidence.to_string()),
        ("parent_entity_id", opt(&entry.parent_entity_id)),
        ("used_entities", entry.used_entities.join(", ")),
        ("checksum", opt(&entry.checksum)),
        ("version", entry.version.clone()),
    ];
    if let (Some(start), Some(end)) = (entry.start_index, entry.end_index) {
        fields.push(("span", format!("{}..{}", start, end)));
    }
    if let Some(credibility) = entry.credibility {
        fields.push(("credibility", credibility.to_string()));
    }
    if !entry.metadata.is_empty() {
        fields.push((
            "metadata",
            serde_json::Value::Object(entry.metadata.clone()).to_string(),
        ));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> ProvenanceEntry {
        ProvenanceEntry::new("entity_1", "person", "ner_extraction")
            .with_source_document("paper.pdf")
            .with_parent("chunk_1")
            .with_confidence(0.87)
            .with_metadata_value("text", "Ada")
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_entries(&[create_test_entry()]).unwrap();
        let parsed: Vec<ProvenanceEntry> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0].entity_id, "entity_1");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let entries = vec![create_test_entry(), ProvenanceEntry::new("e2", "entity", "x")];
        assert_eq!(formatter.format_entries(&entries).unwrap(), "entity_1\ne2");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_entries(&[create_test_entry()]).unwrap();
        assert!(output.contains("Activity"));
        assert!(output.contains("ner_extraction"));
        assert!(output.contains("0.87"));
    }

    #[test]
    fn test_empty_entries() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_entries(&[]).unwrap();
        assert!(output.contains("No entries found"));
    }

    #[test]
    fn test_entry_detail_includes_metadata() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_entry(&create_test_entry()).unwrap();
        assert!(output.contains("parent_entity_id"));
        assert!(output.contains("chunk_1"));
        assert!(output.contains("\"text\":\"Ada\""));
    }

    #[test]
    fn test_empty_lineage() {
        let table = Formatter::new(OutputFormat::Table, false);
        let json = Formatter::new(OutputFormat::Json, false);
        let empty = LineageReport::default();
        assert!(table.format_lineage(&empty).unwrap().contains("No lineage found"));
        assert_eq!(json.format_lineage(&empty).unwrap(), "{}");
    }

    #[test]
    fn test_lineage_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = LineageReport::from_chain(
            "entity_1",
            vec![
                create_test_entry(),
                ProvenanceEntry::new("chunk_1", "chunk", "chunking").with_source_document("doc_1"),
            ],
        );
        let output = formatter.format_lineage(&report).unwrap();
        assert!(output.contains("Lineage of entity_1 (2 entries)"));
        assert!(output.contains("Sources:    paper.pdf, doc_1"));
        assert!(output.contains("Weakest confidence: 0.87"));
    }

    #[test]
    fn test_integrity_report() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = IntegrityReport {
            checked: 3,
            valid: 1,
            invalid: vec!["bad".to_string()],
            missing_checksum: vec!["bare".to_string()],
        };
        let output = formatter.format_integrity(&report).unwrap();
        assert!(output.contains("⚠ 1 of 3 entries verified"));
        assert!(output.contains("✗ checksum mismatch: bad"));
        assert!(output.contains("⚠ no checksum: bare"));

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_integrity(&report).unwrap(), "bad\nbare");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}

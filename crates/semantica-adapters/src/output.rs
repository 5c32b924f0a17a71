//! Export and visualization producers

use crate::tracked::{result_id, Tracked};
use semantica_provenance::TrackOptions;
use serde::{Deserialize, Serialize};

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReceipt {
    /// Export id, if the exporter assigns one
    pub id: Option<String>,
    /// Items written
    pub items_written: usize,
    /// Bytes written
    pub bytes_written: u64,
}

/// A rendered view of some entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendering {
    /// Rendering id, if the visualizer assigns one
    pub id: Option<String>,
    /// Output format ("svg", "html", ...)
    pub format: String,
    /// Rendered content
    pub content: String,
}

/// Writes entities out (export)
pub trait Exporter {
    /// Error type for export
    type Error;

    /// Write `entity_ids` as `format` to `destination`
    fn export(
        &self,
        entity_ids: &[String],
        format: &str,
        destination: &str,
    ) -> Result<ExportReceipt, Self::Error>;
}

/// Renders entities (visualization)
pub trait Visualizer {
    /// Error type for rendering
    type Error;

    /// Render `entity_ids` as `format`
    fn render(&self, entity_ids: &[String], format: &str) -> Result<Rendering, Self::Error>;
}

impl<T: Exporter> Exporter for Tracked<T> {
    type Error = T::Error;

    fn export(
        &self,
        entity_ids: &[String],
        format: &str,
        destination: &str,
    ) -> Result<ExportReceipt, Self::Error> {
        let receipt = (**self).export(entity_ids, format, destination)?;

        self.record("export", |manager| {
            let options = entity_ids.iter().fold(
                TrackOptions::new()
                    .entity_type("export")
                    .activity("export")
                    .location(destination)
                    .metadata_value("format", format)
                    .metadata_value("destination", destination)
                    .metadata_value("items_written", receipt.items_written)
                    .metadata_value("bytes_written", receipt.bytes_written),
                |options, id| options.used_entity(id.as_str()),
            );
            manager.track_entity(
                &result_id(receipt.id.as_deref(), "export"),
                destination,
                options,
            )
        });

        Ok(receipt)
    }
}

impl<T: Visualizer> Visualizer for Tracked<T> {
    type Error = T::Error;

    fn render(&self, entity_ids: &[String], format: &str) -> Result<Rendering, Self::Error> {
        let rendering = (**self).render(entity_ids, format)?;

        self.record("visualization", |manager| {
            let options = entity_ids.iter().fold(
                TrackOptions::new()
                    .entity_type("visualization")
                    .activity("visualization")
                    .metadata_value("format", rendering.format.as_str())
                    .metadata_value("content_length", rendering.content.len()),
                |options, id| options.used_entity(id.as_str()),
            );
            manager.track_entity(
                &result_id(rendering.id.as_deref(), "visualization"),
                &format!("visualization:{}", rendering.format),
                options,
            )
        });

        Ok(rendering)
    }
}

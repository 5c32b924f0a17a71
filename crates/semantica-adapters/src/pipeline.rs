//! Pipeline step producers

use crate::tracked::{result_id, Tracked};
use semantica_provenance::TrackOptions;
use serde_json::Value;

/// One named step of a processing pipeline (pipeline)
///
/// Steps exchange JSON values. A step output carrying a string `id` field is
/// tracked under that id; an input carrying one becomes the parent.
pub trait PipelineStep {
    /// Error type for the step
    type Error;

    /// Step name, recorded as the activity
    fn name(&self) -> &str;

    /// Run the step
    fn run(&self, input: &Value) -> Result<Value, Self::Error>;
}

fn value_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

impl<T: PipelineStep> PipelineStep for Tracked<T> {
    type Error = T::Error;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&self, input: &Value) -> Result<Value, Self::Error> {
        let output = (**self).run(input)?;

        let step = self.name().to_string();
        self.record("pipeline step", |manager| {
            let source = value_id(input)
                .map(str::to_string)
                .unwrap_or_else(|| format!("pipeline:{}", step));
            let mut options = TrackOptions::new()
                .entity_type("pipeline_output")
                .activity(step.as_str())
                .metadata_value("step", step.as_str());
            if let Some(parent) = value_id(input) {
                options = options.parent(parent);
            }
            manager.track_entity(
                &result_id(value_id(&output), "pipeline_output"),
                &source,
                options,
            )
        });

        Ok(output)
    }
}

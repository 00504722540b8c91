//! Convert a Hermes profile into a normalized profile.
//!
//! Runs the three stages in order:
//! 1. Map samples (relative timing, distinct leaves and threads)
//! 2. Deduplicate the frame registry into the frame table
//! 3. Build the stack table and point every sample at its stack
//!
//! The input is only borrowed; the returned profile owns everything it holds.

use super::frame_table::build_frame_table;
use super::sample_mapper::map_samples;
use super::stack_builder::build_stack_table;
use crate::parser::{HermesProfile, NormalizedProfile, Sample, ThreadMetadata};
use crate::utils::config::{DEFAULT_THREAD_NAME, DEFAULT_THREAD_PRIORITY};
use crate::utils::error::ConvertError;
use log::{debug, info, warn};

/// Conversion options
///
/// Every sampled thread is assumed to belong to one thread class, described
/// by these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub thread_name: String,
    pub thread_priority: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            thread_priority: DEFAULT_THREAD_PRIORITY,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_thread_priority(mut self, priority: u32) -> Self {
        self.thread_priority = priority;
        self
    }
}

/// Convert with default options
///
/// **Public** - main entry point for conversion
///
/// # Errors
/// * `ConvertError::NoSamples` - The profile has no samples
pub fn convert_profile(profile: &HermesProfile) -> Result<NormalizedProfile, ConvertError> {
    convert_profile_with(profile, &ConvertOptions::default())
}

/// Convert with explicit options
///
/// # Errors
/// * `ConvertError::NoSamples` - The profile has no samples
pub fn convert_profile_with(
    profile: &HermesProfile,
    options: &ConvertOptions,
) -> Result<NormalizedProfile, ConvertError> {
    if profile.samples.is_empty() {
        warn!("No samples found in profile");
        return Err(ConvertError::NoSamples);
    }

    let mapped = map_samples(&profile.samples);
    debug!(
        "Mapped {} samples ({} distinct leaves, {} threads)",
        mapped.samples.len(),
        mapped.leaf_frame_ids.len(),
        mapped.thread_ids.len()
    );

    let frame_table = build_frame_table(&profile.stack_frames);
    let stack_table = build_stack_table(&mapped.leaf_frame_ids, &profile.stack_frames, &frame_table);

    let samples: Vec<Sample> = mapped
        .samples
        .into_iter()
        .map(|pending| Sample {
            stack_id: stack_table.resolve(pending.leaf_frame_id),
            thread_id: pending.thread_id,
            elapsed_since_start_ns: pending.elapsed_since_start_ns,
        })
        .collect();

    let unknown = samples.iter().filter(|s| s.stack_id.index().is_none()).count();
    if unknown > 0 {
        warn!("{} of {} samples have no resolvable stack", unknown, samples.len());
    }

    let thread_metadata = mapped
        .thread_ids
        .into_iter()
        .map(|thread_id| {
            let metadata = ThreadMetadata {
                name: Some(options.thread_name.clone()),
                priority: Some(options.thread_priority),
            };
            (thread_id, metadata)
        })
        .collect();

    let normalized = NormalizedProfile {
        samples,
        stacks: stack_table.into_stacks(),
        frames: frame_table.into_frames(),
        thread_metadata,
    };

    info!(
        "Converted profile: {} samples, {} stacks, {} frames, {} threads",
        normalized.samples.len(),
        normalized.stacks.len(),
        normalized.frames.len(),
        normalized.thread_metadata.len()
    );

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_hermes_profile, FunctionName, StackRef, ThreadId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn hermes(value: serde_json::Value) -> HermesProfile {
        parse_hermes_profile(&value).unwrap()
    }

    #[test]
    fn test_empty_profile_is_rejected() {
        let profile = hermes(json!({ "samples": [], "stackFrames": {} }));

        assert_eq!(convert_profile(&profile), Err(ConvertError::NoSamples));
    }

    #[test]
    fn test_convert_small_profile() {
        let profile = hermes(json!({
            "samples": [
                { "ts": "1000", "tid": 1, "sf": 3 },
                { "ts": "1500", "tid": 1, "sf": 3 },
                { "ts": "2000", "tid": 1, "sf": 2 }
            ],
            "stackFrames": {
                "1": { "name": "[root]" },
                "2": { "name": "main(app.js:1:1)", "line": "1", "column": "1", "parent": 1 },
                "3": { "name": "render(app.js:10:4)", "line": "10", "column": "4", "parent": 2 }
            }
        }));

        let normalized = convert_profile(&profile).unwrap();

        assert_eq!(normalized.stacks, vec![vec![2, 1, 0], vec![1, 0]]);
        assert_eq!(
            normalized.samples.iter().map(|s| s.stack_id).collect::<Vec<_>>(),
            vec![StackRef::Known(0), StackRef::Known(0), StackRef::Known(1)]
        );
        assert_eq!(normalized.frames[0].function, FunctionName::Anonymous);
        assert_eq!(normalized.frames[2].function, FunctionName::Named("render".to_string()));
        assert!(normalized.is_valid());
    }

    #[test]
    fn test_thread_metadata_uses_options() {
        let profile = hermes(json!({
            "samples": [
                { "ts": 0, "tid": 1, "sf": 1 },
                { "ts": 1, "tid": 2, "sf": 1 }
            ],
            "stackFrames": { "1": { "name": "main" } }
        }));
        let options = ConvertOptions::new()
            .with_thread_name("mqt_js")
            .with_thread_priority(5);

        let normalized = convert_profile_with(&profile, &options).unwrap();

        assert_eq!(normalized.thread_metadata.len(), 2);
        for metadata in normalized.thread_metadata.values() {
            assert_eq!(metadata.name.as_deref(), Some("mqt_js"));
            assert_eq!(metadata.priority, Some(5));
        }
        assert!(normalized.thread_metadata.contains_key(&ThreadId::from(2)));
    }
}

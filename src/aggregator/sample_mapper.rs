//! Map raw Hermes samples to samples with relative timing.
//!
//! Elapsed time is measured from the first sample in input order, in
//! nanoseconds. Samples keep their raw leaf frame id until the stack table
//! exists.

use crate::parser::{FrameId, HermesSample, ThreadId};
use log::warn;
use std::collections::{BTreeSet, HashSet};

/// A sample whose stack reference is still the raw leaf frame id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSample {
    pub leaf_frame_id: FrameId,
    pub thread_id: ThreadId,
    pub elapsed_since_start_ns: u64,
}

/// Output of [`map_samples`]
#[derive(Debug, Clone, Default)]
pub struct MappedSamples {
    /// One per input sample, in input order
    pub samples: Vec<PendingSample>,

    /// Distinct leaf frame ids in first-seen order
    pub leaf_frame_ids: Vec<FrameId>,

    /// Distinct thread ids
    pub thread_ids: BTreeSet<ThreadId>,
}

/// Map raw samples to pending samples
///
/// **Public** - first conversion stage
///
/// # Arguments
/// * `raw_samples` - Hermes samples in capture order
///
/// # Returns
/// Pending samples plus the distinct leaf frame ids and thread ids they
/// reference. An empty input yields an empty result.
pub fn map_samples(raw_samples: &[HermesSample]) -> MappedSamples {
    let Some(first) = raw_samples.first() else {
        return MappedSamples::default();
    };
    let start = first.timestamp;

    let mut seen_leaves = HashSet::new();
    let mut mapped = MappedSamples {
        samples: Vec::with_capacity(raw_samples.len()),
        ..MappedSamples::default()
    };

    for (index, raw) in raw_samples.iter().enumerate() {
        if seen_leaves.insert(raw.leaf_frame_id) {
            mapped.leaf_frame_ids.push(raw.leaf_frame_id);
        }
        if !mapped.thread_ids.contains(&raw.thread_id) {
            mapped.thread_ids.insert(raw.thread_id.clone());
        }

        let delta = raw.timestamp.nanos_since(start);
        let elapsed_since_start_ns = u64::try_from(delta).unwrap_or_else(|_| {
            warn!(
                "Sample {} on thread {} is {}ns before the first sample, clamping to 0",
                index,
                raw.thread_id,
                delta.unsigned_abs()
            );
            0
        });

        mapped.samples.push(PendingSample {
            leaf_frame_id: raw.leaf_frame_id,
            thread_id: raw.thread_id.clone(),
            elapsed_since_start_ns,
        });
    }

    mapped
}

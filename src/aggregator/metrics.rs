//! Summary metrics for a normalized profile.
//!
//! Counts where the samples landed: how many resolved to a stack, and
//! which leaf functions were on-CPU most often.

use crate::parser::{NormalizedProfile, StackRef};
use log::debug;
use std::collections::HashMap;

/// Sample count attributed to one leaf function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCount {
    /// Function name, with `file` when known
    pub function: String,

    pub samples: usize,

    /// Percentage of all samples
    pub percentage: f64,
}

/// Summary statistics for a normalized profile
///
/// **Public** - returned from summarize_profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSummary {
    pub sample_count: usize,
    pub stack_count: usize,
    pub frame_count: usize,
    pub thread_count: usize,

    /// Largest elapsed time of any sample
    pub duration_ns: u64,

    /// Samples whose stack could not be resolved
    pub unknown_stack_samples: usize,

    /// Hottest leaf functions, most samples first
    pub top_functions: Vec<FunctionCount>,
}

impl ProfileSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Samples: {} | Stacks: {} | Frames: {} | Threads: {} | Duration: {:.3}ms | Unknown stacks: {}",
            self.sample_count,
            self.stack_count,
            self.frame_count,
            self.thread_count,
            self.duration_ns as f64 / 1_000_000.0,
            self.unknown_stack_samples
        )
    }
}

/// Calculate summary statistics
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `profile` - Normalized profile
/// * `top_n` - Number of leaf functions to report
pub fn summarize_profile(profile: &NormalizedProfile, top_n: usize) -> ProfileSummary {
    let mut leaf_counts: HashMap<String, usize> = HashMap::new();
    let mut unknown_stack_samples = 0;

    for sample in &profile.samples {
        match leaf_label(profile, sample.stack_id) {
            Some(label) => *leaf_counts.entry(label).or_insert(0) += 1,
            None => unknown_stack_samples += 1,
        }
    }

    let total = profile.samples.len();
    let mut top_functions: Vec<FunctionCount> = leaf_counts
        .into_iter()
        .map(|(function, samples)| FunctionCount {
            function,
            samples,
            percentage: percentage(samples, total),
        })
        .collect();

    // Ties broken by name so output is stable
    top_functions.sort_by(|a, b| b.samples.cmp(&a.samples).then_with(|| a.function.cmp(&b.function)));
    top_functions.truncate(top_n);

    debug!("Summarized {} samples, {} without a stack", total, unknown_stack_samples);

    ProfileSummary {
        sample_count: total,
        stack_count: profile.stacks.len(),
        frame_count: profile.frames.len(),
        thread_count: profile.thread_metadata.len(),
        duration_ns: profile.duration_ns(),
        unknown_stack_samples,
        top_functions,
    }
}

fn leaf_label(profile: &NormalizedProfile, stack_id: StackRef) -> Option<String> {
    let stack = profile.stacks.get(stack_id.index()?)?;
    let frame = profile.frames.get(*stack.first()?)?;

    Some(match &frame.file {
        Some(file) => format!("{} ({})", frame.function, file),
        None => frame.function.to_string(),
    })
}

fn percentage(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Frame, FunctionName, Sample, ThreadId};

    fn frame(name: &str, file: Option<&str>) -> Frame {
        Frame {
            function: FunctionName::new(name),
            file: file.map(str::to_string),
            line: None,
            column: None,
        }
    }

    fn sample(stack_id: StackRef, elapsed: u64) -> Sample {
        Sample {
            stack_id,
            thread_id: ThreadId::from(1),
            elapsed_since_start_ns: elapsed,
        }
    }

    fn test_profile() -> NormalizedProfile {
        NormalizedProfile {
            samples: vec![
                sample(StackRef::Known(0), 0),
                sample(StackRef::Known(0), 10),
                sample(StackRef::Known(1), 20),
                sample(StackRef::Unknown, 30),
            ],
            stacks: vec![vec![1, 0], vec![0]],
            frames: vec![frame("main", None), frame("render", Some("app.js"))],
            ..NormalizedProfile::default()
        }
    }

    #[test]
    fn test_summarize_profile() {
        let summary = summarize_profile(&test_profile(), 10);

        assert_eq!(summary.sample_count, 4);
        assert_eq!(summary.stack_count, 2);
        assert_eq!(summary.duration_ns, 30);
        assert_eq!(summary.unknown_stack_samples, 1);
        assert_eq!(summary.top_functions.len(), 2);
        assert_eq!(summary.top_functions[0].function, "render (app.js)");
        assert_eq!(summary.top_functions[0].samples, 2);
        assert_eq!(summary.top_functions[0].percentage, 50.0);
        assert_eq!(summary.top_functions[1].function, "main");
    }

    #[test]
    fn test_top_n_truncates() {
        let summary = summarize_profile(&test_profile(), 1);
        assert_eq!(summary.top_functions.len(), 1);
    }

    #[test]
    fn test_summary_empty() {
        let summary = summarize_profile(&NormalizedProfile::default(), 5);
        assert_eq!(summary, ProfileSummary::default());
    }
}

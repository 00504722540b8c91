//! Fold normalized samples into collapsed stack lines.
//!
//! Format: "root;caller;leaf count", one line per distinct stack.
//!
//! Example: "[root];main;render 12"
//! This means: 12 samples were taken while render, called from main, was on-CPU.

use crate::parser::{NormalizedProfile, StackRef};
use std::collections::HashMap;

/// Label for samples whose stack could not be resolved
pub const UNKNOWN_STACK_LABEL: &str = "[unknown]";

/// A single collapsed stack entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack as semicolon-separated frames, root first
    pub stack: String,

    /// Number of samples on this stack
    pub weight: u64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Render as a folded-stack line
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from a normalized profile
///
/// **Public** - input for flamegraph generation
///
/// Unknown-stack samples are kept under [`UNKNOWN_STACK_LABEL`] so the
/// graph still accounts for them. Result is sorted by weight, heaviest first.
pub fn build_collapsed_stacks(profile: &NormalizedProfile) -> Vec<CollapsedStack> {
    let mut weight_by_stack: HashMap<StackRef, u64> = HashMap::new();
    for sample in &profile.samples {
        *weight_by_stack.entry(sample.stack_id).or_insert(0) += 1;
    }

    let mut collapsed: HashMap<String, u64> = HashMap::new();
    for (stack_id, weight) in weight_by_stack {
        *collapsed.entry(stack_label(profile, stack_id)).or_insert(0) += weight;
    }

    let mut stacks: Vec<CollapsedStack> = collapsed
        .into_iter()
        .map(|(stack, weight)| CollapsedStack::new(stack, weight))
        .collect();

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));

    stacks
}

fn stack_label(profile: &NormalizedProfile, stack_id: StackRef) -> String {
    let frames = stack_id
        .index()
        .and_then(|index| profile.stacks.get(index))
        .filter(|stack| !stack.is_empty());

    let Some(frames) = frames else {
        return UNKNOWN_STACK_LABEL.to_string();
    };

    // Stacks are stored leaf first, folded lines read root first
    frames
        .iter()
        .rev()
        .map(|&index| {
            profile
                .frames
                .get(index)
                .map_or_else(|| UNKNOWN_STACK_LABEL.to_string(), |f| sanitize(f.function.as_str()))
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// `;` separates frames in the folded format
fn sanitize(name: &str) -> String {
    name.replace(';', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Frame, FunctionName, Sample, ThreadId};

    fn frame(name: &str) -> Frame {
        Frame {
            function: FunctionName::new(name),
            file: None,
            line: None,
            column: None,
        }
    }

    fn sample(stack_id: StackRef) -> Sample {
        Sample {
            stack_id,
            thread_id: ThreadId::from(1),
            elapsed_since_start_ns: 0,
        }
    }

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("main;render".to_string(), 3);
        assert_eq!(stack.to_line(), "main;render 3");
    }

    #[test]
    fn test_build_collapsed_stacks() {
        let profile = NormalizedProfile {
            samples: vec![
                sample(StackRef::Known(0)),
                sample(StackRef::Known(0)),
                sample(StackRef::Known(1)),
                sample(StackRef::Unknown),
            ],
            stacks: vec![vec![2, 1, 0], vec![1, 0]],
            frames: vec![frame(""), frame("main"), frame("a;b")],
            ..NormalizedProfile::default()
        };

        let stacks = build_collapsed_stacks(&profile);

        assert_eq!(
            stacks,
            vec![
                CollapsedStack::new("anonymous;main;a,b".to_string(), 2),
                CollapsedStack::new("[unknown]".to_string(), 1),
                CollapsedStack::new("anonymous;main".to_string(), 1),
            ]
        );
    }
}

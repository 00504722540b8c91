//! Flamegraph generation using the inferno library.
//!
//! This module folds normalized samples into collapsed stacks and renders
//! them as interactive SVG flamegraphs.

pub mod collapsed;
pub mod generator;

// Re-export main types
pub use collapsed::{build_collapsed_stacks, CollapsedStack};
pub use generator::{
    generate_flamegraph, generate_flamegraph_from_stacks, generate_text_summary, FlamegraphConfig,
};

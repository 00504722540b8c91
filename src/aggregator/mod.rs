//! Conversion of Hermes profiles into normalized frame/stack tables.
//!
//! This module transforms decoded Hermes profiles into:
//! - A deduplicated frame table
//! - A deduplicated stack table (leaf-first frame indices)
//! - Samples with relative timing that point into the stack table
//! - Summary metrics over the result

pub mod converter;
pub mod frame_table;
pub mod metrics;
pub mod sample_mapper;
pub mod stack_builder;

// Re-export main types and functions
pub use converter::{convert_profile, convert_profile_with, ConvertOptions};
pub use frame_table::{build_frame_table, FrameTable};
pub use metrics::{summarize_profile, FunctionCount, ProfileSummary};
pub use sample_mapper::{map_samples, MappedSamples, PendingSample};
pub use stack_builder::{build_stack_table, StackTable};

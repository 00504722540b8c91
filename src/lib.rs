//! Hermes Profile
//!
//! Converts Hermes sampling profiles (timestamped samples pointing at a
//! parent-linked frame registry) into flattened, deduplicated thread CPU
//! profiles: a frame table, a stack table of leaf-first frame indices, and
//! samples carrying nanosecond offsets from the first sample.
//!
//! ## Getting Started
//!
//! ```ignore
//! use hermes_profile::aggregator::convert_profile;
//! use hermes_profile::parser::read_hermes_profile;
//!
//! let hermes = read_hermes_profile("hermes.cpuprofile")?;
//! let profile = convert_profile(&hermes)?;
//! assert!(profile.is_valid());
//! ```
//!
//! The `hermes-profile` binary wraps the same pipeline:
//!
//! ```bash
//! hermes-profile convert --input hermes.cpuprofile --output profile.json
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod utils;

pub use aggregator::{convert_profile, convert_profile_with, ConvertOptions};
pub use parser::{HermesProfile, NormalizedProfile};
pub use utils::error::ConvertError;

//! Profile parsing and schema definitions.
//!
//! This module handles:
//! - Decoding Hermes sampling profiles
//! - Splitting frame names into function/file parts
//! - Defining the normalized output schema

pub mod frame_name;
pub mod hermes;
pub mod schema;

// Re-export main types
pub use frame_name::{parse_frame_name, FrameName};
pub use hermes::{
    parse_hermes_profile, read_hermes_profile, FrameId, HermesProfile, HermesSample,
    HermesStackFrame, Timestamp,
};
pub use schema::{
    Frame, FunctionName, InvariantViolation, NormalizedProfile, ProfileDocument, Sample, Stack,
    StackRef, ThreadId, ThreadMetadata,
};

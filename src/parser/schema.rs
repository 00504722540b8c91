//! Output JSON schema definitions for normalized profile data.
//!
//! This module defines the flattened `{samples, stacks, frames, thread_metadata}`
//! structure we hand to downstream encoders and write to disk.
//! Schema is versioned to allow future evolution.

use crate::utils::config::{ANONYMOUS_FUNCTION_NAME, PLATFORM, SCHEMA_VERSION, UNKNOWN_STACK_ID};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Identifier of a sampled thread
///
/// Hermes emits thread ids as integers or strings; both normalize to the
/// decimal string form used as `thread_metadata` keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ThreadId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ThreadId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawThreadId {
            Number(u64),
            Text(String),
        }

        Ok(match RawThreadId::deserialize(deserializer)? {
            RawThreadId::Number(id) => ThreadId::from(id),
            RawThreadId::Text(id) => ThreadId(id),
        })
    }
}

/// Function name of a normalized frame
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionName {
    Named(String),
    /// No usable name; written as `"anonymous"`
    Anonymous,
}

impl FunctionName {
    /// Build a function name, collapsing blank and `anonymous` names
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == ANONYMOUS_FUNCTION_NAME {
            FunctionName::Anonymous
        } else if trimmed.len() == name.len() {
            FunctionName::Named(name)
        } else {
            FunctionName::Named(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FunctionName::Named(name) => name,
            FunctionName::Anonymous => ANONYMOUS_FUNCTION_NAME,
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FunctionName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FunctionName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(FunctionName::new)
    }
}

/// Reference from a sample into the stack table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackRef {
    Known(usize),
    /// The sample's leaf frame could not be resolved; written as `-1`
    Unknown,
}

impl StackRef {
    pub fn index(&self) -> Option<usize> {
        match self {
            StackRef::Known(index) => Some(*index),
            StackRef::Unknown => None,
        }
    }
}

impl Serialize for StackRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StackRef::Known(index) => serializer.serialize_u64(*index as u64),
            StackRef::Unknown => serializer.serialize_i64(UNKNOWN_STACK_ID),
        }
    }
}

impl<'de> Deserialize<'de> for StackRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            return Ok(StackRef::Unknown);
        }
        usize::try_from(raw)
            .map(StackRef::Known)
            .map_err(|_| de::Error::custom(format!("stack id out of range: {}", raw)))
    }
}

/// A deduplicated stack frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub function: FunctionName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Frame-table indices, leaf frame first, root frame last
pub type Stack = Vec<usize>;

/// A single normalized sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub stack_id: StackRef,

    pub thread_id: ThreadId,

    /// Nanoseconds since the first sample, carried as a decimal string
    #[serde(with = "decimal_string")]
    pub elapsed_since_start_ns: u64,
}

/// Per-thread metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// The flattened, deduplicated profile produced by conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    pub samples: Vec<Sample>,

    pub stacks: Vec<Stack>,

    pub frames: Vec<Frame>,

    #[serde(default)]
    pub thread_metadata: BTreeMap<ThreadId, ThreadMetadata>,
}

/// A broken structural invariant in a normalized profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("stack {stack} references frame {frame} at position {position}, but only {frame_count} frames exist")]
    FrameOutOfRange {
        stack: usize,
        position: usize,
        frame: usize,
        frame_count: usize,
    },

    #[error("sample {sample} references stack {stack}, but only {stack_count} stacks exist")]
    StackOutOfRange {
        sample: usize,
        stack: usize,
        stack_count: usize,
    },

    #[error("sample {sample} is on thread {thread_id}, which has no thread metadata")]
    MissingThreadMetadata { sample: usize, thread_id: ThreadId },

    #[error("first sample starts at {elapsed_ns}ns instead of 0")]
    FirstSampleNotAtZero { elapsed_ns: u64 },
}

impl NormalizedProfile {
    /// Check the structural invariants downstream consumers rely on
    ///
    /// **Public** - used by the `validate` command and tests
    ///
    /// # Returns
    /// Every violation found, in table order (empty when the profile is sound)
    pub fn validate(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let frame_count = self.frames.len();
        let stack_count = self.stacks.len();

        for (stack, frames) in self.stacks.iter().enumerate() {
            for (position, &frame) in frames.iter().enumerate() {
                if frame >= frame_count {
                    violations.push(InvariantViolation::FrameOutOfRange {
                        stack,
                        position,
                        frame,
                        frame_count,
                    });
                }
            }
        }

        for (index, sample) in self.samples.iter().enumerate() {
            if let StackRef::Known(stack) = sample.stack_id {
                if stack >= stack_count {
                    violations.push(InvariantViolation::StackOutOfRange {
                        sample: index,
                        stack,
                        stack_count,
                    });
                }
            }
            if !self.thread_metadata.contains_key(&sample.thread_id) {
                violations.push(InvariantViolation::MissingThreadMetadata {
                    sample: index,
                    thread_id: sample.thread_id.clone(),
                });
            }
        }

        if let Some(first) = self.samples.first() {
            if first.elapsed_since_start_ns != 0 {
                violations.push(InvariantViolation::FirstSampleNotAtZero {
                    elapsed_ns: first.elapsed_since_start_ns,
                });
            }
        }

        violations
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Largest elapsed time of any sample, in nanoseconds
    ///
    /// Samples from different threads may arrive out of order, so this is
    /// not necessarily the last sample's offset.
    pub fn duration_ns(&self) -> u64 {
        self.samples
            .iter()
            .map(|s| s.elapsed_since_start_ns)
            .max()
            .unwrap_or(0)
    }
}

/// Top-level document written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Schema version for compatibility checking
    pub version: String,

    /// Platform the profile was recorded on
    pub platform: String,

    /// Timestamp when the document was generated
    pub generated_at: String,

    pub profile: NormalizedProfile,
}

impl ProfileDocument {
    pub fn new(profile: NormalizedProfile) -> Self {
        use chrono::Utc;

        Self {
            version: SCHEMA_VERSION.to_string(),
            platform: PLATFORM.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            profile,
        }
    }
}

/// `u64` carried as a decimal string, accepting plain numbers on input
mod decimal_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(value),
            Raw::Text(text) => text
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid decimal string: {:?}", text))),
        }
    }
}

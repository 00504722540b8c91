//! Hermes sampling-profile input types and decoding.
//!
//! A Hermes profile is a list of timestamped samples plus a registry of
//! parent-linked stack frames:
//!
//! ```json
//! {
//!   "samples": [{ "ts": "1000", "tid": 1, "sf": 3 }],
//!   "stackFrames": {
//!     "1": { "name": "[root]" },
//!     "2": { "name": "main(app.js:1:1)", "line": "1", "column": "1", "parent": 1 },
//!     "3": { "name": "render(app.js:10:4)", "line": "10", "column": "4", "parent": 2 }
//!   }
//! }
//! ```
//!
//! Hermes is loose about numeric encodings, so identifiers, thread ids and
//! timestamps accept both JSON numbers and numeric strings.

use super::schema::ThreadId;
use crate::utils::config::NANOS_PER_MICRO;
use crate::utils::error::ParseError;
use log::debug;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// Identifier of a frame in the Hermes frame registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for FrameId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FrameIdVisitor;

        impl<'de> Visitor<'de> for FrameIdVisitor {
            type Value = FrameId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a frame id as an integer or numeric string")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<FrameId, E> {
                Ok(FrameId(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<FrameId, E> {
                u64::try_from(value)
                    .map(FrameId)
                    .map_err(|_| E::custom(format!("negative frame id: {}", value)))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<FrameId, E> {
                value
                    .trim()
                    .parse()
                    .map(FrameId)
                    .map_err(|_| E::custom(format!("invalid frame id: {:?}", value)))
            }
        }

        // Registry keys arrive as strings, `sf`/`parent` usually as numbers
        deserializer.deserialize_any(FrameIdVisitor)
    }
}

/// Absolute sample timestamp, held in nanoseconds
///
/// Hermes reports microseconds; sub-nanosecond digits are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_micros(micros: i64) -> Self {
        Self(micros.saturating_mul(NANOS_PER_MICRO))
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Signed distance from `start` to `self`
    pub fn nanos_since(&self, start: Timestamp) -> i64 {
        self.0.saturating_sub(start.0)
    }
}

impl FromStr for Timestamp {
    type Err = ParseError;

    /// Parse a decimal microsecond value such as `"1500"` or `"1500.25"`
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let invalid = || ParseError::InvalidFormat(format!("Invalid timestamp: {:?}", raw));

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let micros: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        // Three fractional digits are nanoseconds; anything finer is dropped
        let sub_micro = fraction
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(3)
            .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));

        let nanos = micros
            .checked_mul(NANOS_PER_MICRO)
            .and_then(|n| n.checked_add(sub_micro))
            .ok_or_else(invalid)?;

        Ok(Timestamp(if negative { -nanos } else { nanos }))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl<'de> Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a microsecond timestamp as a number or decimal string")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Timestamp, E> {
                i64::try_from(value)
                    .ok()
                    .and_then(|micros| micros.checked_mul(NANOS_PER_MICRO))
                    .map(Timestamp)
                    .ok_or_else(|| E::custom(format!("timestamp out of range: {}", value)))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Timestamp, E> {
                value
                    .checked_mul(NANOS_PER_MICRO)
                    .map(Timestamp)
                    .ok_or_else(|| E::custom(format!("timestamp out of range: {}", value)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Timestamp, E> {
                let nanos = (value * NANOS_PER_MICRO as f64).trunc();
                if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
                    return Err(E::custom(format!("timestamp out of range: {}", value)));
                }
                Ok(Timestamp(nanos as i64))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Timestamp, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}

/// A single Hermes sample
#[derive(Debug, Clone, Deserialize)]
pub struct HermesSample {
    #[serde(rename = "ts")]
    pub timestamp: Timestamp,

    #[serde(rename = "tid")]
    pub thread_id: ThreadId,

    /// Leaf (innermost) frame of the sampled call stack
    #[serde(rename = "sf")]
    pub leaf_frame_id: FrameId,
}

/// A frame descriptor from the Hermes `stackFrames` registry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HermesStackFrame {
    /// Encodes the function and, for JS frames, its location
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "numeric_string")]
    pub line: Option<String>,

    #[serde(default, deserialize_with = "numeric_string")]
    pub column: Option<String>,

    #[serde(default, rename = "parent")]
    pub parent_id: Option<FrameId>,

    /// e.g. "JavaScript" or "Native"; informational only
    #[serde(default)]
    pub category: Option<String>,
}

/// A decoded Hermes sampling profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HermesProfile {
    pub samples: Vec<HermesSample>,

    /// Ordered by frame id so table indices are stable across runs
    #[serde(default, rename = "stackFrames")]
    pub stack_frames: BTreeMap<FrameId, HermesStackFrame>,
}

/// Decode a Hermes profile from parsed JSON
///
/// **Public** - main entry point for ingestion
///
/// # Errors
/// * `ParseError::InvalidFormat` - Not an object, or no `samples` array
/// * `ParseError::JsonError` - A sample or frame has the wrong shape
pub fn parse_hermes_profile(raw: &serde_json::Value) -> Result<HermesProfile, ParseError> {
    let obj = raw.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Hermes profile must be a JSON object".to_string())
    })?;

    match obj.get("samples") {
        Some(samples) if samples.is_array() => {}
        Some(_) => {
            return Err(ParseError::InvalidFormat(
                "`samples` must be an array".to_string(),
            ))
        }
        None => {
            return Err(ParseError::InvalidFormat(
                "Missing `samples` array".to_string(),
            ))
        }
    }

    let profile = HermesProfile::deserialize(raw)?;

    debug!(
        "Decoded Hermes profile: {} samples, {} stack frames",
        profile.samples.len(),
        profile.stack_frames.len()
    );

    Ok(profile)
}

/// Read and decode a Hermes profile from a JSON file
pub fn read_hermes_profile(input_path: impl AsRef<Path>) -> Result<HermesProfile, ParseError> {
    let input_path = input_path.as_ref();

    debug!("Reading Hermes profile from: {}", input_path.display());

    let file = File::open(input_path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

    parse_hermes_profile(&raw)
}

/// Accept `"12"`, `12` or `null` for an optional numeric field
fn numeric_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a number or numeric string, found {}",
            other
        ))),
    }
}

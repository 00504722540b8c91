//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding a Hermes profile
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read profile: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid profile format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during profile conversion
///
/// Data-quality problems inside a profile never surface here; they degrade
/// to the unknown/anonymous sentinels instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConvertError {
    #[error("No samples found in profile")]
    NoSamples,
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Failed to generate flamegraph: {0}")]
    GenerationFailed(String),

    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Generated SVG is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

//! Configuration and constants for the converter and CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Platform label stamped on written profile documents
pub const PLATFORM: &str = "javascript";

/// Function name used when a frame name yields no usable function
pub const ANONYMOUS_FUNCTION_NAME: &str = "anonymous";

/// Wire value of a sample whose stack could not be resolved
pub const UNKNOWN_STACK_ID: i64 = -1;

/// Name Hermes gives to the synthetic root of its call tree
pub const HERMES_ROOT_FRAME_NAME: &str = "[root]";

// Every sampled thread belongs to the single JS thread class
pub const DEFAULT_THREAD_NAME: &str = "JavaScriptThread";
pub const DEFAULT_THREAD_PRIORITY: u32 = 1;

// Hermes timestamps are microseconds, output is nanoseconds
pub const NANOS_PER_MICRO: i64 = 1_000;

/// Default number of leaf functions listed in a summary
pub const DEFAULT_TOP_FUNCTIONS: usize = 10;

/// Default flamegraph width in pixels
pub const DEFAULT_FLAMEGRAPH_WIDTH: usize = 1200;

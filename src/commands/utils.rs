use crate::output::read_profile;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use log::warn;
use std::path::Path;

/// Validate a profile JSON file
///
/// Fails if the file cannot be read or any structural invariant is broken.
pub fn validate_profile_file(file_path: impl AsRef<Path>) -> Result<()> {
    let file_path = file_path.as_ref();
    println!("Validating profile: {}", file_path.display());

    let document = read_profile(file_path)?;
    let profile = &document.profile;
    let violations = profile.validate();

    if !violations.is_empty() {
        println!("✗ Profile has {} invariant violations", violations.len());
        for violation in violations.iter().take(20) {
            println!("  - {}", violation);
        }
        anyhow::bail!("Profile {} is invalid", file_path.display());
    }

    if document.version != SCHEMA_VERSION {
        warn!(
            "Profile schema version {} differs from current {}",
            document.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid profile JSON");
    println!("  Version: {}", document.version);
    println!("  Platform: {}", document.platform);
    println!("  Samples: {}", profile.samples.len());
    println!("  Stacks: {}", profile.stacks.len());
    println!("  Frames: {}", profile.frames.len());
    println!("  Threads: {}", profile.thread_metadata.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Hermes Profile Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string              - Schema version (e.g., '1.0.0')");
        println!("  platform: string             - Recording platform");
        println!("  generated_at: string         - ISO 8601 timestamp");
        println!("  profile: object");
        println!("    samples: array");
        println!("      stack_id: number         - Index into stacks, -1 if unknown");
        println!("      thread_id: string        - Sampled thread");
        println!("      elapsed_since_start_ns: string - Nanoseconds since first sample");
        println!("    stacks: array of arrays    - Frame indices, leaf first");
        println!("    frames: array");
        println!("      function: string         - Function name or 'anonymous'");
        println!("      file: string?            - Source file");
        println!("      line: number?            - Line number");
        println!("      column: number?          - Column number");
        println!("    thread_metadata: object    - Thread id -> {{ name, priority }}");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Hermes Profile v{}", env!("CARGO_PKG_VERSION"));
    println!("Profile Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Converts Hermes sampling profiles into deduplicated thread CPU profiles.");
}

//! Convert command implementation.
//!
//! The convert command:
//! 1. Reads the Hermes profile
//! 2. Converts it to a normalized profile
//! 3. Checks the result's invariants
//! 4. Generates a flamegraph (optional)
//! 5. Writes output files

use super::models::ConvertArgs;
use crate::aggregator::{convert_profile_with, summarize_profile, ProfileSummary};
use crate::flamegraph::{generate_flamegraph, generate_text_summary};
use crate::output::{write_profile, write_profile_compact, write_svg};
use crate::parser::{read_hermes_profile, ProfileDocument};
use crate::utils::error::ConvertError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Summary of the written profile, or `None` when the input had no samples
/// and nothing was written
///
/// # Errors
/// * Unreadable or malformed input
/// * A converted profile that breaks its own invariants
/// * File write errors
pub fn execute_convert(args: ConvertArgs) -> Result<Option<ProfileSummary>> {
    let start_time = Instant::now();

    info!("Converting Hermes profile: {}", args.input.display());

    // Step 1: Read input
    info!("Step 1/5: Reading Hermes profile...");
    let hermes = read_hermes_profile(&args.input)
        .with_context(|| format!("Failed to read Hermes profile {}", args.input.display()))?;

    // Step 2: Convert
    info!("Step 2/5: Converting samples, frames and stacks...");
    let profile = match convert_profile_with(&hermes, &args.options) {
        Ok(profile) => profile,
        Err(ConvertError::NoSamples) => {
            warn!("Profile produced no samples, nothing written");
            return Ok(None);
        }
    };

    // Step 3: Self-check
    info!("Step 3/5: Checking profile invariants...");
    let violations = profile.validate();
    if let Some(first) = violations.first() {
        anyhow::bail!(
            "Converted profile is inconsistent ({} violations, first: {})",
            violations.len(),
            first
        );
    }

    let summary = summarize_profile(&profile, args.top_functions);
    info!("{}", summary.summary());

    // Step 4: Generate flamegraph (if requested)
    let svg_content = if args.output_svg.is_some() {
        info!("Step 4/5: Generating flamegraph...");
        let svg = generate_flamegraph(&profile, args.flamegraph_config.as_ref())
            .context("Failed to generate flamegraph")?;
        Some(svg)
    } else {
        info!("Step 4/5: Skipping flamegraph generation (not requested)");
        None
    };

    // Step 5: Write outputs
    info!("Step 5/5: Writing output files...");
    let document = ProfileDocument::new(profile);

    let written = if args.compact {
        write_profile_compact(&document, &args.output_json)
    } else {
        write_profile(&document, &args.output_json)
    };
    written.context("Failed to write profile JSON")?;

    info!("✓ Profile written to: {}", args.output_json.display());

    if let (Some(svg), Some(svg_path)) = (svg_content, &args.output_svg) {
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;

        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("PROFILE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Input: {}", args.input.display());
        println!("\n{}", generate_text_summary(&summary));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    debug!("Conversion completed in {:.2}s", elapsed.as_secs_f64());

    Ok(Some(summary))
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.output_json == args.input {
        anyhow::bail!("Output path must differ from the input path");
    }

    if args.options.thread_name.trim().is_empty() {
        anyhow::bail!("Thread name cannot be empty");
    }

    if args.top_functions == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top_functions > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }

    if let Some(config) = &args.flamegraph_config {
        if config.width == 0 {
            anyhow::bail!("Flamegraph width must be greater than 0");
        }
    }

    Ok(())
}

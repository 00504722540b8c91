//! SVG flamegraph generation using inferno.
//!
//! Folded stacks from [`build_collapsed_stacks`] are fed straight to
//! `inferno::flamegraph::from_lines`; one sample is one unit of width.

use super::collapsed::{build_collapsed_stacks, CollapsedStack};
use crate::aggregator::metrics::ProfileSummary;
use crate::parser::NormalizedProfile;
use crate::utils::config::DEFAULT_FLAMEGRAPH_WIDTH;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::{self, Options};
use log::info;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Hermes CPU Profile".to_string(),
            width: DEFAULT_FLAMEGRAPH_WIDTH,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// Generate an SVG flamegraph from a normalized profile
///
/// **Public** - main entry point for flamegraph generation
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - Profile has no samples
/// * `FlamegraphError::GenerationFailed` - inferno rejected the input
pub fn generate_flamegraph(
    profile: &NormalizedProfile,
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    let stacks = build_collapsed_stacks(profile);
    generate_flamegraph_from_stacks(&stacks, config)
}

/// Generate an SVG flamegraph from already collapsed stacks
pub fn generate_flamegraph_from_stacks(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} stacks", stacks.len());

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();

    let mut options = Options::default();
    options.title = config.title;
    options.count_name = "samples".to_string();
    options.image_width = Some(config.width);

    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::GenerationFailed(e.to_string()))?;

    let svg = String::from_utf8(svg)?;
    info!("Flamegraph generated successfully ({} bytes)", svg.len());

    Ok(svg)
}

/// Create a text summary with the hottest leaf functions
pub fn generate_text_summary(summary: &ProfileSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  {}", summary.summary()));
    lines.push(String::new());
    lines.push("  HOTTEST LEAF FUNCTIONS".to_string());
    lines.push(format!("  {:<60} {:>10} {:>8}", "Function", "Samples", "%"));
    lines.push(format!("  {}", "-".repeat(80)));

    for entry in &summary.top_functions {
        // Keep the tail: file names are more telling than long prefixes
        let display = if entry.function.chars().count() > 60 {
            let tail: String = entry
                .function
                .chars()
                .rev()
                .take(57)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            entry.function.clone()
        };

        lines.push(format!(
            "  {:<60} {:>10} {:>7.1}%",
            display, entry.samples, entry.percentage
        ));
    }

    if summary.top_functions.is_empty() {
        lines.push("  (no resolvable stacks)".to_string());
    }

    lines.join("\n")
}

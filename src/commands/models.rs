use crate::aggregator::ConvertOptions;
use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::DEFAULT_TOP_FUNCTIONS;
use std::path::PathBuf;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the Hermes profile JSON
    pub input: PathBuf,

    /// Output path for the normalized profile JSON
    pub output_json: PathBuf,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Thread class applied to every sampled thread
    pub options: ConvertOptions,

    /// Write JSON without pretty printing
    pub compact: bool,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Number of leaf functions in the summary
    pub top_functions: usize,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: PathBuf::from("profile.json"),
            output_svg: None,
            flamegraph_config: None,
            options: ConvertOptions::default(),
            compact: false,
            print_summary: false,
            top_functions: DEFAULT_TOP_FUNCTIONS,
        }
    }
}

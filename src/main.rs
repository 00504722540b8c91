//! Hermes Profile CLI
//!
//! Converts Hermes sampling profiles into deduplicated thread CPU profiles
//! and optionally renders them as flamegraphs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use hermes_profile::aggregator::ConvertOptions;
use hermes_profile::commands::{
    display_schema, display_version, execute_convert, validate_args, validate_profile_file,
    ConvertArgs,
};
use hermes_profile::flamegraph::FlamegraphConfig;
use hermes_profile::utils::config::{
    DEFAULT_FLAMEGRAPH_WIDTH, DEFAULT_THREAD_NAME, DEFAULT_THREAD_PRIORITY, DEFAULT_TOP_FUNCTIONS,
};

/// Hermes Profile - normalize Hermes sampling profiles
#[derive(Parser, Debug)]
#[command(name = "hermes-profile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a Hermes profile into a normalized profile
    Convert {
        /// Path to the Hermes profile JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the normalized profile JSON
        #[arg(short, long, default_value = "profile.json")]
        output: PathBuf,

        /// Output path for SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value_t = DEFAULT_FLAMEGRAPH_WIDTH)]
        width: usize,

        /// Thread name recorded for every sampled thread
        #[arg(long, env = "HERMES_PROFILE_THREAD_NAME", default_value = DEFAULT_THREAD_NAME)]
        thread_name: String,

        /// Thread priority recorded for every sampled thread
        #[arg(long, env = "HERMES_PROFILE_THREAD_PRIORITY", default_value_t = DEFAULT_THREAD_PRIORITY)]
        thread_priority: u32,

        /// Write JSON without pretty printing
        #[arg(long)]
        compact: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of leaf functions in the summary
        #[arg(long, default_value_t = DEFAULT_TOP_FUNCTIONS)]
        top: usize,
    },

    /// Validate a normalized profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Convert {
            input,
            output,
            flamegraph,
            title,
            width,
            thread_name,
            thread_priority,
            compact,
            summary,
            top,
        } => {
            let flamegraph_config = flamegraph.as_ref().map(|_| {
                let config = FlamegraphConfig::new().with_width(width);
                match title {
                    Some(title) => config.with_title(title),
                    None => config,
                }
            });

            let args = ConvertArgs {
                input,
                output_json: output,
                output_svg: flamegraph,
                flamegraph_config,
                options: ConvertOptions::new()
                    .with_thread_name(thread_name)
                    .with_thread_priority(thread_priority),
                compact,
                print_summary: summary,
                top_functions: top,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute conversion; an empty profile is logged and skipped
            execute_convert(args)?;
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

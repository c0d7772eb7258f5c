//! Command-line interface for linepatch.
//!
//! This module handles argument parsing and user interface only.
//! No patching logic is performed here.

use clap::Parser;
use std::path::PathBuf;

/// Linepatch: brace-balanced, line-span-safe single-file source patcher.
#[derive(Parser, Debug)]
#[command(name = "linepatch")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available linepatch commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Apply a conversion plan to an input file, writing a patched copy.
    Apply {
        /// Path to the source file to patch.
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the patched copy (overwritten if present).
        #[arg(short, long)]
        output: PathBuf,

        /// Path to the JSON conversion plan.
        #[arg(short, long)]
        plan: PathBuf,
    },

    /// Locate the line span of a brace-delimited construct.
    Locate {
        /// Path to the source file to scan.
        #[arg(short, long)]
        input: PathBuf,

        /// Signature substring identifying the construct's first line.
        #[arg(short, long)]
        signature: String,

        /// Line index to begin scanning from (0-based).
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
}

/// Parse command-line arguments.
///
/// This function is the entry point for CLI argument parsing.
/// It returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

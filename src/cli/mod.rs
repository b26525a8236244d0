//! CLI module - Command-line interface for anicat
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// anicat - Anime catalog maintenance
/// Merges catalog stores from other instances into the local one
#[derive(Parser)]
#[command(name = "anicat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config.toml and create the local catalog
    Init,

    /// Validate a catalog store and show what it contains
    #[command(alias = "i")]
    Inspect {
        /// Path to the catalog store
        file: PathBuf,
    },

    /// Merge a catalog store into the local catalog
    #[command(alias = "m")]
    Merge {
        /// Path to the catalog store
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write a copy of the local catalog that other instances can merge
    Export {
        /// Destination file; must not exist
        dest: PathBuf,
    },

    /// Show local catalog counts
    #[command(alias = "s")]
    Stats,
}

pub use commands::*;

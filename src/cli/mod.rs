//! CLI definitions for panda-config
//!
//! The main entry point is the `Cli` struct; output formatting for each
//! subcommand lives in [`render`].

pub mod render;

use crate::config::ConfigPaths;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Resolve and inspect the service configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search for config.yml (also searches DIR/config)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Read exactly this configuration file (must exist)
    #[arg(short, long, global = true, conflicts_with = "dir")]
    pub file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Search paths selected by `--dir` / `--file`.
    pub fn paths(&self) -> ConfigPaths {
        match (&self.file, &self.dir) {
            (Some(file), _) => ConfigPaths::explicit(file.clone()),
            (None, Some(dir)) => ConfigPaths::with_root(dir.clone()),
            (None, None) => ConfigPaths::discover(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved configuration (default if no subcommand given)
    Show(ShowArgs),

    /// Look up one key in the merged default+file values
    Get(GetArgs),

    /// Show where each service address came from
    Sources,
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Print secrets instead of masking them
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key, e.g. mq.nats.server
    pub key: String,

    /// Type to coerce the value to
    #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    String,
    Int,
    Uint,
    Bool,
    List,
    Float,
}

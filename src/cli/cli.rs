use std::path::PathBuf;

use clap::Parser;

use crate::cli::LogLevel;

/// An in-memory hierarchical namespace with an interactive shell.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML manifest used to pre-populate the namespace
    #[clap(long, short)]
    pub seed: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

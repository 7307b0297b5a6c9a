use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::common::config::DEFAULT_CONFIG_PATH;
use crate::manifest::Section;

/// hostcleanup — return an agent host to a clean state
#[derive(Parser, Debug)]
#[command(
    name = "hostcleanup",
    version,
    about = "Removes the packages, users, directories and repositories a cluster agent installed",
    long_about = "hostcleanup reads the host check results written by the agent and removes\n\
                  the processes, packages, users, directories, repository files and\n\
                  alternatives they list. Every step is best-effort: failures are logged\n\
                  and the run continues. Must be run as root.",
    after_help = "EXAMPLES:\n  \
        hostcleanup                                   Clean using the agent's host check results\n  \
        hostcleanup --skip users,repositories         Leave accounts and repo files alone\n  \
        hostcleanup -f check.result,custom.result -s  Explicit inputs, no prompt\n  \
        hostcleanup --format json > report.json       Machine-readable summary"
)]
pub struct Cli {
    /// Debug-level logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Host check result files to read, concatenated in order
    #[arg(long = "file", short = 'f', value_name = "FILE", value_delimiter = ',')]
    pub input_files: Option<Vec<PathBuf>>,

    /// Log file to store results
    #[arg(long = "out", short = 'o', value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Sections to leave untouched (packages|users|usr_homedir|directories|additional_directories|repositories|processes|alternatives|cache)
    #[arg(long, short = 'k', value_name = "SECTIONS", value_delimiter = ',')]
    pub skip: Vec<Section>,

    /// Silently accept default prompt values
    #[arg(long, short)]
    pub silent: bool,

    /// Agent configuration file
    #[arg(
        long,
        short,
        value_name = "FILE",
        env = "HOSTCLEANUP_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Summary format printed when the run finishes
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

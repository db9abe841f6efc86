//! Command-line argument definition.

use clap::Parser;

/// pipseek - interactive PyPI search with install, update and removal via pip
#[derive(Parser, Debug)]
#[command(name = "pipseek")]
#[command(version)]
#[command(
    about = "Search PyPI interactively and install, update or remove packages via pip",
    long_about = None
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Query terms (ranked mode) or a prefix-anchored regular expression
    /// (with --regex)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Show each package's license in the results list
    #[arg(short = 'L', long)]
    pub license: bool,

    /// Show each package's homepage in the results list
    #[arg(short = 'H', long)]
    pub homepage: bool,

    /// Show each package's upload date in the results list
    #[arg(short = 'd', long)]
    pub date: bool,

    /// Show each package's archive size in the results list
    #[arg(short = 's', long)]
    pub size: bool,

    /// Treat the query as a prefix-anchored regular expression over the full
    /// package-name catalog (unranked, unlimited)
    #[arg(short = 'r', long)]
    pub regex: bool,

    /// Maximum number of ranked results to keep (defaults to the configured
    /// limit)
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose logging (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

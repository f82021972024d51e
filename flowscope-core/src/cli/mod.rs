mod check;
mod matching;
mod run;

pub use check::*;
use clap::Subcommand;
pub use matching::*;
pub use run::*;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "config/flowscope.hcl";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the visualization session (default)
    Run {
        /// Path to the Flowscope config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },

    /// Validate configuration and exit
    Check {
        /// Path to the Flowscope config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Print errors without fancy formatting
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Match newline-delimited records from stdin and print the resulting queue
    Match {
        /// Path to the Flowscope config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

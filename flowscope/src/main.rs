use clap::Parser;
use flowscope_core::cli::{self, Command, DEFAULT_CONFIG};
use flowscope_core::logging::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "flowscope",
    version,
    about = "Flowscope: live event-log visualization"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging();

    match cli.command {
        Some(Command::Check { config, plain }) => cli::check(config, plain),

        Some(Command::Match { config }) => cli::run_match(config),

        Some(Command::Run { config, plain }) => cli::run(config, plain).await,

        None => cli::run(PathBuf::from(DEFAULT_CONFIG), false).await,
    }
}

use crate::conf::load_config;
use crate::presentation::ConsolePresenter;
use crate::runtime::{self, stdin_controls};
use std::path::PathBuf;

pub async fn run(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    let cfg = load_config(&path)?;

    if let Some(title) = &cfg.title {
        tracing::info!(title = %title, "configuration loaded");
    }
    tracing::info!(
        "controls: next, reset, replay, back, clear, filter component <id>, filter fsm <id>, unfilter, quit"
    );

    let presenter = ConsolePresenter::new(!plain);
    let stats = runtime::run(cfg, presenter, stdin_controls()).await;

    tracing::info!(
        ignored = stats.ignored_records,
        discarded_batches = stats.discarded_batches,
        "bye"
    );
    Ok(())
}

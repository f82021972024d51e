use crate::channel::{ChannelEvent, run_channel};
use crate::conf::RuntimeConfig;
use crate::diagnostics::Diagnostic;
use crate::pipeline::{Mode, Session, SessionStats};
use crate::presentation::Presenter;
use crate::record::FrameBatch;
use crate::runtime::Control;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};

const CHANNEL_BUFFER: usize = 256;

/// Drive one session until `Quit` or an interrupt.
///
/// Playback, rate calculation, channel batches and controls are all
/// handled on this one task, each to completion, so the session is never
/// touched concurrently. The channel is only opened when the session
/// starts live. Returns the final session stats once every timer and the
/// channel task have stopped.
pub async fn run<P: Presenter>(
    cfg: RuntimeConfig,
    mut presenter: P,
    mut controls: mpsc::Receiver<Control>,
) -> SessionStats {
    let mut session = Session::from_config(&cfg);
    tracing::info!(
        mode = %session.mode(),
        rules = cfg.engine.len(),
        steps = cfg.steps.len(),
        "session started"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (channel_tx, mut channel_rx) = mpsc::channel(CHANNEL_BUFFER);

    let channel_task = match &cfg.channel {
        Some(channel) if session.mode() == Mode::Live => Some(tokio::spawn(run_channel(
            channel.clone(),
            channel_tx,
            shutdown_rx,
        ))),
        Some(_) => {
            tracing::info!(mode = %session.mode(), "channel not opened");
            None
        }
        None => None,
    };
    let mut channel_open = channel_task.is_some();
    let mut controls_open = true;

    let mut playback = interval(Duration::from_millis(
        cfg.session.event_separation_interval_ms,
    ));
    playback.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let rate_enabled = cfg.session.rate_calculation_enabled;
    let mut rate = interval(Duration::from_millis(
        cfg.session.rate_calculation_interval_ms,
    ));
    rate.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = playback.tick() => {
                if let Some(event) = session.tick() {
                    presenter.present(&event);
                }
            }

            _ = rate.tick(), if rate_enabled => {
                if let Some(report) = session.rate_tick() {
                    tracing::debug!(per_second = report.per_second, "rate calculated");
                    presenter.rate(&report);
                }
            }

            event = channel_rx.recv(), if channel_open => match event {
                Some(ChannelEvent::Batch(batch)) => ingest_frame(&mut session, batch),
                Some(ChannelEvent::Diagnostic(diagnostic)) => session.report(diagnostic),
                None => {
                    tracing::info!("channel task finished");
                    channel_open = false;
                }
            },

            control = controls.recv(), if controls_open => match control {
                Some(control) => {
                    tracing::debug!(control = %control, "control received");
                    if !control.apply(&mut session) {
                        break;
                    }
                }
                None => controls_open = false,
            },

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received");
                break;
            }
        }

        flush(&mut session, &mut presenter);
    }

    let _ = shutdown_tx.send(true);
    if let Some(task) = channel_task
        && let Err(err) = task.await
    {
        tracing::error!(error = %err, "channel task failed");
    }

    flush(&mut session, &mut presenter);
    let stats = session.stats();
    tracing::info!(
        mode = %stats.mode,
        queued = stats.queued,
        ignored = stats.ignored_records,
        "session stopped"
    );
    stats
}

/// Hand one decoded frame to the session. Lines that failed to decode are
/// reported and dropped; the rest of the frame still counts.
fn ingest_frame(session: &mut Session, batch: FrameBatch) {
    for err in &batch.errors {
        tracing::warn!(error = %err, "frame line dropped");
        session.report(Diagnostic::error(err.to_string()));
    }

    for notice in batch.notices {
        session.report(notice);
    }

    if !batch.records.is_empty() {
        session.ingest(batch.records);
    }
}

fn flush<P: Presenter>(session: &mut Session, presenter: &mut P) {
    for diagnostic in session.drain_diagnostics() {
        diagnostic.emit();
        presenter.diagnostic(&diagnostic);
    }
}

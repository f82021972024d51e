use crate::conf::RuntimeConfig;
use crate::diagnostics::Diagnostic;
use crate::error::PipelineError;
use crate::matcher::Classifier;
use crate::pipeline::{
    AliasResolver, DEFAULT_REPLAY_CAPACITY, Filter, Mode, ModeController, PendingQueue,
    RateEstimator, RateReport, ReplayLog, VisualEvent, fold,
};
use crate::record::{RawRecord, sort_by_timestamp};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub hide_ignored_messages: bool,
    pub rate_calculation_enabled: bool,
    pub replay_capacity: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            hide_ignored_messages: false,
            rate_calculation_enabled: false,
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub mode: Mode,
    pub cursor: usize,
    pub steps: usize,
    pub queued: usize,
    pub replay_logged: usize,
    pub ignored_records: u64,
    pub discarded_batches: u64,
    pub pending_aliases: usize,
}

/// All mutable pipeline state for one visualization session.
///
/// Every handler runs to completion before the next one, so an entry popped
/// by `tick` is always fully aggregated. Diagnostics raised by any handler
/// accumulate until `drain_diagnostics`.
pub struct Session {
    classifier: Arc<dyn Classifier>,
    settings: SessionSettings,

    queue: PendingQueue,
    replay_log: ReplayLog,
    mode: ModeController,
    rate: RateEstimator,
    aliases: AliasResolver,
    filter: Option<Filter>,

    diagnostics: Vec<Diagnostic>,
    ignored_records: u64,
    discarded_batches: u64,
}

impl Session {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        settings: SessionSettings,
        scripted_steps: Vec<Vec<VisualEvent>>,
    ) -> Self {
        let replay_log = ReplayLog::new(settings.replay_capacity);
        Self {
            classifier,
            settings,
            queue: PendingQueue::new(),
            replay_log,
            mode: ModeController::new(scripted_steps),
            rate: RateEstimator::new(),
            aliases: AliasResolver::new(),
            filter: None,
            diagnostics: Vec::new(),
            ignored_records: 0,
            discarded_batches: 0,
        }
    }

    /// Build a session from a validated configuration. A configured
    /// correlation id is installed as the initial filter.
    pub fn from_config(cfg: &RuntimeConfig) -> Self {
        let mut session = Self::new(
            cfg.engine.clone(),
            SessionSettings::from(&cfg.session),
            cfg.steps.clone(),
        );
        session.filter = cfg.initial_filter();
        session
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn cursor(&self) -> usize {
        self.mode.cursor()
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn replay_log(&self) -> &ReplayLog {
        &self.replay_log
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            mode: self.mode.mode(),
            cursor: self.mode.cursor(),
            steps: self.mode.step_count(),
            queued: self.queue.len(),
            replay_logged: self.replay_log.len(),
            ignored_records: self.ignored_records,
            discarded_batches: self.discarded_batches,
            pending_aliases: self.aliases.pending(),
        }
    }

    //-------------------------------------------------------------------------
    // Ingestion
    //-------------------------------------------------------------------------

    /// Match and fold one batch from the channel.
    ///
    /// Batches are only taken in live mode; elsewhere they are discarded so
    /// live and recorded causality never interleave.
    pub fn ingest(&mut self, mut records: Vec<RawRecord>) {
        if !self.mode.accepts_live_batches() {
            self.discarded_batches += 1;
            tracing::debug!(mode = %self.mode.mode(), records = records.len(), "batch discarded");
            if !self.settings.hide_ignored_messages {
                self.report(Diagnostic::debug("Ignored incoming message."));
            }
            return;
        }

        sort_by_timestamp(&mut records);

        if self.settings.rate_calculation_enabled {
            for timestamp in records.iter().filter_map(|r| r.timestamp) {
                self.rate.sample(timestamp);
            }
        }

        for record in &records {
            let events = self.classifier.classify(record);

            if events.is_empty() {
                self.ignored_records += 1;
                if !self.settings.hide_ignored_messages {
                    self.report(Diagnostic::debug(format!("Ignoring event: {}", record.value)));
                }
                continue;
            }

            for event in events {
                for ready in self.aliases.resolve(event) {
                    self.enqueue_folded(ready);
                }
            }
        }

        tracing::trace!(queued = self.queue.len(), "batch folded");
    }

    fn admits(&self, event: &VisualEvent) -> bool {
        self.filter.as_ref().is_none_or(|f| f.admits(event))
    }

    fn enqueue_folded(&mut self, event: VisualEvent) {
        if self.admits(&event) {
            fold(event, &mut self.queue);
        }
    }

    fn enqueue_verbatim(&mut self, event: VisualEvent) {
        if self.admits(&event) {
            self.queue.push_back(event);
        }
    }

    //-------------------------------------------------------------------------
    // Playback
    //-------------------------------------------------------------------------

    /// Pop the next entry for presentation. Live entries are kept for replay.
    pub fn tick(&mut self) -> Option<VisualEvent> {
        let event = self.queue.pop_front()?;
        if self.mode.mode() == Mode::Live {
            self.replay_log.push(event.clone());
        }
        Some(event)
    }

    /// Close the current rate window. `None` when rate calculation is off or
    /// the session is not live.
    pub fn rate_tick(&mut self) -> Option<RateReport> {
        if !self.settings.rate_calculation_enabled || self.mode.mode() != Mode::Live {
            self.rate.clear();
            return None;
        }

        Some(RateReport {
            per_second: self.rate.take(),
            logged_events: self.replay_log.len(),
        })
    }

    //-------------------------------------------------------------------------
    // Controls
    //-------------------------------------------------------------------------

    /// Feed the next recorded batch. Returns how many events it held.
    pub fn advance(&mut self) -> Result<usize, PipelineError> {
        let batch = self.mode.advance().map_err(|e| self.reject(e))?;

        let Some(batch) = batch else {
            self.report(Diagnostic::debug(format!(
                "-- end of steps ({}/{}) --",
                self.mode.cursor(),
                self.mode.step_count()
            )));
            return Ok(0);
        };

        let count = batch.len();
        // Replay slots already hold aggregated entries; queue them as observed.
        let verbatim = self.mode.mode() == Mode::Replay;
        for event in batch {
            if verbatim {
                self.enqueue_verbatim(event);
            } else {
                self.enqueue_folded(event);
            }
        }

        tracing::debug!(
            mode = %self.mode.mode(),
            cursor = self.mode.cursor(),
            steps = self.mode.step_count(),
            count,
            "advanced"
        );
        Ok(count)
    }

    pub fn reset(&mut self) -> Result<(), PipelineError> {
        self.mode.reset().map_err(|e| self.reject(e))?;
        self.report(Diagnostic::debug("-- reset --"));
        Ok(())
    }

    pub fn enter_replay(&mut self) -> Result<(), PipelineError> {
        let snapshot = self.replay_log.snapshot();
        self.mode.enter_replay(snapshot).map_err(|e| self.reject(e))?;

        self.queue.clear();
        self.rate.clear();
        self.drop_incomplete();
        self.report(Diagnostic::happy(
            "-- Replay event log mode; ignoring real-time messages --",
        ));
        Ok(())
    }

    pub fn exit_replay(&mut self) -> Result<(), PipelineError> {
        self.mode.exit_replay().map_err(|e| self.reject(e))?;

        self.replay_log.clear();
        self.queue.clear();
        self.rate.clear();
        self.drop_incomplete();
        self.report(Diagnostic::info("-- Back to real-time mode --"));
        Ok(())
    }

    pub fn clear_replay_log(&mut self) -> Result<(), PipelineError> {
        if self.mode.mode() != Mode::Live {
            let err = PipelineError::invalid(
                self.mode.mode(),
                "clear the replay log",
                "the replay log is only kept in live mode",
            );
            return Err(self.reject(err));
        }

        self.replay_log.clear();
        self.report(Diagnostic::debug("-- Replay event log is now empty --"));
        Ok(())
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.report(Diagnostic::info(format!("-- filtering on {filter} --")));
        self.filter = Some(filter);
    }

    pub fn clear_filter(&mut self) {
        if self.filter.take().is_some() {
            self.report(Diagnostic::info("-- filter cleared --"));
        }
    }

    //-------------------------------------------------------------------------
    // Diagnostics
    //-------------------------------------------------------------------------

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Events held for an alias belong to the live stream that was just cut.
    fn drop_incomplete(&mut self) {
        let dropped = self.aliases.clear_pending();
        if dropped > 0 {
            tracing::debug!(dropped, "incomplete events dropped");
        }
    }

    fn reject(&mut self, err: PipelineError) -> PipelineError {
        tracing::warn!(error = %err, "mode transition rejected");
        self.report(Diagnostic::error(err.to_string()));
        err
    }
}

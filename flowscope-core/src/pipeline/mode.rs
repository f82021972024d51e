use crate::error::PipelineError;
use crate::pipeline::VisualEvent;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    Live,
    Scripted,
    Replay,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Scripted => f.write_str("scripted"),
            Self::Replay => f.write_str("replay"),
        }
    }
}

/// Decides where batches come from.
///
/// Live ingests from the channel. Scripted and Replay step through a recorded
/// sequence of batches with a cursor. Replay is only reachable from Live and
/// always returns to Live.
#[derive(Debug, Clone)]
pub struct ModeController {
    // state machine data
    mode: Mode,

    // Scripted / Replay
    steps: Vec<Vec<VisualEvent>>,
    cursor: usize,
}

impl ModeController {
    /// Scripted when a step sequence is given, Live otherwise.
    pub fn new(scripted_steps: Vec<Vec<VisualEvent>>) -> Self {
        let mode = if scripted_steps.is_empty() {
            Mode::Live
        } else {
            Mode::Scripted
        };

        Self {
            mode,
            steps: scripted_steps,
            cursor: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn accepts_live_batches(&self) -> bool {
        self.mode == Mode::Live
    }

    pub fn enter_replay(&mut self, snapshot: Vec<Vec<VisualEvent>>) -> Result<(), PipelineError> {
        match self.mode {
            Mode::Live if snapshot.is_empty() => Err(PipelineError::invalid(
                self.mode,
                "enter replay",
                "the replay event log is empty",
            )),
            Mode::Live => {
                self.mode = Mode::Replay;
                self.steps = snapshot;
                self.cursor = 0;
                Ok(())
            }
            Mode::Scripted | Mode::Replay => Err(PipelineError::invalid(
                self.mode,
                "enter replay",
                "replay starts from live mode only",
            )),
        }
    }

    pub fn exit_replay(&mut self) -> Result<(), PipelineError> {
        if self.mode != Mode::Replay {
            return Err(PipelineError::invalid(
                self.mode,
                "exit replay",
                "not replaying",
            ));
        }

        self.mode = Mode::Live;
        self.steps.clear();
        self.cursor = 0;
        Ok(())
    }

    /// The next recorded batch, or `None` once the sequence is exhausted.
    /// The cursor never moves past the end.
    pub fn advance(&mut self) -> Result<Option<Vec<VisualEvent>>, PipelineError> {
        if self.mode == Mode::Live {
            return Err(PipelineError::invalid(
                self.mode,
                "advance",
                "there is no recorded sequence in live mode",
            ));
        }

        let batch = self.steps.get(self.cursor).cloned();
        if batch.is_some() {
            self.cursor += 1;
        }
        Ok(batch)
    }

    pub fn reset(&mut self) -> Result<(), PipelineError> {
        if self.mode == Mode::Live {
            return Err(PipelineError::invalid(
                self.mode,
                "reset",
                "there is no recorded sequence in live mode",
            ));
        }

        self.cursor = 0;
        Ok(())
    }
}

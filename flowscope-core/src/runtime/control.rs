use crate::pipeline::{Filter, Session};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// A user action on a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Advance,
    Reset,
    EnterReplay,
    ExitReplay,
    ClearReplayLog,
    SetFilter(Filter),
    ClearFilter,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown control '{0}' (try: next, reset, replay, back, clear, filter component <id>, filter fsm <id>, unfilter, quit)")]
pub struct UnknownControl(pub String);

impl FromStr for Control {
    type Err = UnknownControl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let control = match words.as_slice() {
            ["next" | "advance"] => Self::Advance,
            ["reset"] => Self::Reset,
            ["replay"] => Self::EnterReplay,
            ["back" | "restore"] => Self::ExitReplay,
            ["clear"] => Self::ClearReplayLog,
            ["filter", "component", id] => Self::SetFilter(Filter::Component(id.to_string())),
            ["filter", "fsm", id] => Self::SetFilter(Filter::Fsm(id.to_string())),
            ["unfilter"] => Self::ClearFilter,
            ["quit" | "exit"] => Self::Quit,
            _ => return Err(UnknownControl(s.trim().to_string())),
        };
        Ok(control)
    }
}

impl Display for Control {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Advance => f.write_str("next"),
            Self::Reset => f.write_str("reset"),
            Self::EnterReplay => f.write_str("replay"),
            Self::ExitReplay => f.write_str("back"),
            Self::ClearReplayLog => f.write_str("clear"),
            Self::SetFilter(filter) => write!(f, "filter {filter}"),
            Self::ClearFilter => f.write_str("unfilter"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

impl Control {
    /// Apply to the session. Returns `false` when the session should stop.
    ///
    /// Rejected transitions are already reported by the session as
    /// diagnostics, so they only get a debug record here.
    pub fn apply(self, session: &mut Session) -> bool {
        let result = match &self {
            Self::Advance => session.advance().map(drop),
            Self::Reset => session.reset(),
            Self::EnterReplay => session.enter_replay(),
            Self::ExitReplay => session.exit_replay(),
            Self::ClearReplayLog => session.clear_replay_log(),
            Self::SetFilter(filter) => {
                session.set_filter(filter.clone());
                Ok(())
            }
            Self::ClearFilter => {
                session.clear_filter();
                Ok(())
            }
            Self::Quit => return false,
        };

        if let Err(err) = result {
            tracing::debug!(control = %self, error = %err, "control had no effect");
        }
        true
    }
}

/// Read controls from stdin, one per line. Unknown lines are logged and
/// skipped. The channel closes at end of input.
pub fn stdin_controls() -> mpsc::Receiver<Control> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<Control>() {
                    Ok(control) => {
                        if tx.send(control).await.is_err() {
                            return;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "control ignored"),
                },
                Ok(None) => return,
                Err(err) => {
                    tracing::error!(error = %err, "failed to read controls from stdin");
                    return;
                }
            }
        }
    });

    rx
}

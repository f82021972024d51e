use crate::conf::{ReconnectConfig, ReconnectKind};
use std::time::Duration;

/// What to do after the channel fails to connect or drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    /// Report the failure and stop ingesting.
    #[default]
    Never,
    /// Retry with a doubling delay, capped at `max_delay`.
    Backoff {
        initial_delay: Duration,
        max_delay: Duration,
        max_attempts: Option<u32>,
    },
}

impl ReconnectPolicy {
    /// Delay before retry number `attempt` (1-based), or `None` to give up.
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        match *self {
            Self::Never => None,
            Self::Backoff {
                initial_delay,
                max_delay,
                max_attempts,
            } => {
                if attempt == 0 || max_attempts.is_some_and(|max| attempt > max) {
                    return None;
                }
                let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
                Some(initial_delay.saturating_mul(factor).min(max_delay))
            }
        }
    }
}

impl From<&ReconnectConfig> for ReconnectPolicy {
    fn from(cfg: &ReconnectConfig) -> Self {
        match cfg.policy {
            ReconnectKind::Never => Self::Never,
            ReconnectKind::Backoff => Self::Backoff {
                initial_delay: Duration::from_millis(cfg.initial_delay_ms),
                max_delay: Duration::from_millis(cfg.max_delay_ms),
                max_attempts: cfg.max_attempts,
            },
        }
    }
}

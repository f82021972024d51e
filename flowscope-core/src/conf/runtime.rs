use crate::conf::{ChannelConfig, ComponentConfig, SessionConfig};
use crate::matcher::RuleEngine;
use crate::pipeline::{Filter, SessionSettings, VisualEvent};
use std::sync::Arc;

/// A validated configuration, ready to drive a session.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: Option<String>,
    pub session: SessionConfig,
    pub channel: Option<ChannelConfig>,
    pub components: Vec<ComponentConfig>,
    pub engine: Arc<RuleEngine>,
    /// Recorded batches; non-empty starts the session in scripted mode.
    pub steps: Vec<Vec<VisualEvent>>,
    pub fsm_id: Option<String>,
}

impl RuntimeConfig {
    pub fn initial_filter(&self) -> Option<Filter> {
        self.fsm_id.clone().map(Filter::Fsm)
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(cfg: &SessionConfig) -> Self {
        Self {
            hide_ignored_messages: cfg.hide_ignored_messages,
            rate_calculation_enabled: cfg.rate_calculation_enabled,
            replay_capacity: cfg.replay_capacity,
        }
    }
}

use crate::pipeline::{DEFAULT_REPLAY_CAPACITY, EventType, LogLine, VisualEvent};
use serde::{Deserialize, Serialize};

/// A configuration file exactly as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowConfig {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub session: SessionConfig,

    /// No channel means no ingestion.
    #[serde(default)]
    pub channel: Option<ChannelConfig>,

    #[serde(default)]
    pub components: Vec<ComponentConfig>,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// A non-empty step list starts the session in scripted mode.
    #[serde(default)]
    pub steps: Vec<StepConfig>,

    /// Correlation id filter installed at startup.
    #[serde(default)]
    pub fsm_id: Option<String>,
}

//-----------------------------------------------------------------------------
// Session
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Playback tick period.
    #[serde(default = "session_default_event_separation_interval_ms")]
    pub event_separation_interval_ms: u64,

    #[serde(default)]
    pub rate_calculation_enabled: bool,

    #[serde(default = "session_default_rate_calculation_interval_ms")]
    pub rate_calculation_interval_ms: u64,

    #[serde(default)]
    pub hide_ignored_messages: bool,

    #[serde(default = "session_default_replay_capacity")]
    pub replay_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            event_separation_interval_ms: session_default_event_separation_interval_ms(),
            rate_calculation_enabled: false,
            rate_calculation_interval_ms: session_default_rate_calculation_interval_ms(),
            hide_ignored_messages: false,
            replay_capacity: session_default_replay_capacity(),
        }
    }
}

fn session_default_event_separation_interval_ms() -> u64 {
    500
}

fn session_default_rate_calculation_interval_ms() -> u64 {
    1000
}

fn session_default_replay_capacity() -> usize {
    DEFAULT_REPLAY_CAPACITY
}

//-----------------------------------------------------------------------------
// Channel
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    pub url: String,

    #[serde(default)]
    pub heartbeat: Option<HeartbeatConfig>,

    #[serde(default)]
    pub reconnect: ReconnectConfig,

    /// Sent to the upstream once per connection.
    #[serde(default)]
    pub server_config: Option<ServerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeartbeatConfig {
    #[serde(default = "heartbeat_default_interval_ms")]
    pub interval_ms: u64,

    /// Random v4 uuid when unset.
    #[serde(default)]
    pub uuid: Option<String>,
}

fn heartbeat_default_interval_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconnectKind {
    #[default]
    Never,
    Backoff,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconnectConfig {
    #[serde(default)]
    pub policy: ReconnectKind,

    #[serde(default = "reconnect_default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "reconnect_default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Unlimited when unset.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            policy: ReconnectKind::default(),
            initial_delay_ms: reconnect_default_initial_delay_ms(),
            max_delay_ms: reconnect_default_max_delay_ms(),
            max_attempts: None,
        }
    }
}

fn reconnect_default_initial_delay_ms() -> u64 {
    500
}

fn reconnect_default_max_delay_ms() -> u64 {
    30_000
}

/// The upstream's consumer configuration. Brokers are comma separated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brokers: Option<String>,

    #[serde(default)]
    pub consumers: Vec<ConsumerConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brokers: Option<String>,

    /// All partitions when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,

    #[serde(default)]
    pub topic: String,

    /// `oldest`, `newest` (default) or an absolute offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

//-----------------------------------------------------------------------------
// Components / Rules / Steps
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentConfig {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,

    #[serde(default)]
    pub events: Vec<EventTemplateConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    /// Template rendered against the record, e.g. `{{.Topic}}`.
    pub field: String,
    pub pattern: String,
}

/// Every string field is a template; empty renders are omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventTemplateConfig {
    pub event_type: String,
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub fsm_id: String,
    #[serde(default)]
    pub fsm_id_alias: String,
    #[serde(default)]
    pub aggregate: bool,
    #[serde(default)]
    pub no_parse: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    #[serde(default)]
    pub events: Vec<StepEventConfig>,
}

/// A recorded event, already resolved.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepEventConfig {
    pub event_type: EventType,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub fsm_id: Option<String>,
    #[serde(default)]
    pub aggregate: bool,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl From<StepEventConfig> for VisualEvent {
    fn from(cfg: StepEventConfig) -> Self {
        let mut event = VisualEvent::new(cfg.event_type).aggregated(cfg.aggregate);
        event.source_id = cfg.source_id;
        event.target_id = cfg.target_id;
        event.text = cfg.text;
        event.color = cfg.color;
        event.fsm_id = cfg.fsm_id;
        event.logs = cfg
            .logs
            .into_iter()
            .map(|text| LogLine { text, color: None })
            .collect();
        event
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// An A -> B interaction between two components.
    Message,
    /// A log line with no edge.
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type '{0}' (expected 'message' or 'log')")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "message" => Ok(Self::Message),
            "log" => Ok(Self::Log),
            other => Err(UnknownEventType(other.to_string())),
        }
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message => f.write_str("message"),
            Self::Log => f.write_str("log"),
        }
    }
}

/// The textual contribution of one occurrence folded into a queue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A matched, template-resolved visualization instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEvent {
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fsm_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fsm_id_alias: Option<String>,
    /// Key of the record that produced the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub aggregate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogLine>,
}

fn default_count() -> u32 {
    1
}

impl VisualEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            source_id: None,
            target_id: None,
            text: None,
            color: None,
            fsm_id: None,
            fsm_id_alias: None,
            key: None,
            count: 1,
            aggregate: false,
            json: None,
            logs: Vec::new(),
        }
    }

    pub fn message(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: Some(source_id.into()),
            target_id: Some(target_id.into()),
            ..Self::new(EventType::Message)
        }
    }

    pub fn log(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(EventType::Log)
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_fsm_id(mut self, fsm_id: impl Into<String>) -> Self {
        self.fsm_id = Some(fsm_id.into());
        self
    }

    pub fn with_fsm_id_alias(mut self, alias: impl Into<String>) -> Self {
        self.fsm_id_alias = Some(alias.into());
        self
    }

    pub fn aggregated(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn log_line(&self) -> Option<LogLine> {
        self.text.as_ref().map(|text| LogLine {
            text: text.clone(),
            color: self.color.clone(),
        })
    }

    pub fn is_message(&self) -> bool {
        self.event_type == EventType::Message
    }
}

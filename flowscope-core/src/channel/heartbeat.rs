use crate::conf::HeartbeatConfig;
use crate::error::ChannelError;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Liveness frame sent upstream on its own interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heartbeat {
    pub uuid: String,
    #[serde(skip)]
    pub interval: Duration,
}

impl Heartbeat {
    pub fn new(uuid: impl Into<String>, interval: Duration) -> Self {
        Self {
            uuid: uuid.into(),
            interval,
        }
    }

    pub fn frame(&self) -> Result<String, ChannelError> {
        serde_json::to_string(self).map_err(|source| ChannelError::Encode {
            what: "heartbeat",
            source,
        })
    }
}

impl From<&HeartbeatConfig> for Heartbeat {
    fn from(cfg: &HeartbeatConfig) -> Self {
        let uuid = cfg
            .uuid
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self::new(uuid, Duration::from_millis(cfg.interval_ms))
    }
}

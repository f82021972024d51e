use crate::pipeline::Mode;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// A frame line that could not be decoded into a record.
#[derive(Debug, Error)]
#[error("couldn't parse this as JSON: {line}: {source}")]
pub struct ParseError {
    pub line: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot {action} in {mode} mode: {reason}")]
    InvalidModeTransition {
        mode: Mode,
        action: &'static str,
        reason: &'static str,
    },
}

impl PipelineError {
    pub(crate) fn invalid(mode: Mode, action: &'static str, reason: &'static str) -> Self {
        Self::InvalidModeTransition {
            mode,
            action,
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("failed to send {what}: {source}")]
    Send {
        what: &'static str,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("failed to receive from channel: {source}")]
    Receive {
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("channel closed by peer")]
    Closed,
}

impl ChannelError {
    pub fn connect(url: impl Into<String>, source: tungstenite::Error) -> Self {
        Self::Connect {
            url: url.into(),
            source: Box::new(source),
        }
    }

    pub fn send(what: &'static str, source: tungstenite::Error) -> Self {
        Self::Send {
            what,
            source: Box::new(source),
        }
    }

    pub fn receive(source: tungstenite::Error) -> Self {
        Self::Receive {
            source: Box::new(source),
        }
    }
}

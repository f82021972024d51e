use crate::conf::ValidationErrors;
use crate::matcher::TemplateError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("config validation failed")]
    Validation {
        #[related]
        validation_errors: Vec<ConfigError>,
    },

    //-------------------------------------------------------------------------
    // Rules
    //-------------------------------------------------------------------------
    #[error("rule {rule} has no patterns")]
    EmptyRulePatterns { rule: usize },

    #[error("rule {rule} produces no events")]
    EmptyRuleEvents { rule: usize },

    #[error("rule {rule} has an invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        rule: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{location}: {source}")]
    InvalidTemplate {
        location: String,
        #[source]
        source: TemplateError,
    },

    #[error("{location}: unknown event type '{value}' (expected 'message' or 'log')")]
    InvalidEventType { location: String, value: String },

    //-------------------------------------------------------------------------
    // Components / Steps
    //-------------------------------------------------------------------------
    #[error("{location} references undeclared component '{component}'")]
    UnknownComponent { location: String, component: String },

    #[error("duplicate component definition: {id}")]
    DuplicateComponent { id: String },

    #[error("steps[{step}] has no events")]
    EmptyStep { step: usize },

    //-------------------------------------------------------------------------
    // Session / Channel
    //-------------------------------------------------------------------------
    #[error("invalid {field}: must be > 0")]
    InvalidInterval { field: &'static str },

    #[error("invalid session.replay_capacity: must be > 0")]
    InvalidReplayCapacity,

    #[error(
        "invalid reconnect backoff: initial_delay_ms ({initial_delay_ms}) exceeds max_delay_ms ({max_delay_ms})"
    )]
    InvalidBackoff {
        initial_delay_ms: u64,
        max_delay_ms: u64,
    },

    #[error("invalid channel url '{url}': expected ws:// or wss://")]
    InvalidChannelUrl { url: String },

    #[error("server_config.consumers[{consumer}] has no topic")]
    MissingConsumerTopic { consumer: usize },

    #[error("no broker information available for server_config.consumers[{consumer}]")]
    MissingBrokers { consumer: usize },

    #[error(
        "invalid offset '{offset}' for server_config.consumers[{consumer}] (expected 'oldest', 'newest' or a number)"
    )]
    InvalidOffset { consumer: usize, offset: String },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation {
            validation_errors: errors.0,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Severity tag carried by every diagnostic.
///
/// The names double as the color keywords accepted in event templates, so a
/// server notice tagged `"error"` surfaces with `Severity::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Severe,
    Error,
    Warning,
    Info,
    Trace,
    Debug,
    Happy,
}

impl Severity {
    /// Maps a color keyword onto a severity. Unknown keywords are `Info`.
    pub fn from_color(color: &str) -> Self {
        match color.trim().to_ascii_lowercase().as_str() {
            "severe" => Self::Severe,
            "error" => Self::Error,
            "warning" => Self::Warning,
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "happy" => Self::Happy,
            _ => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Severe => "severe",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Happy => "happy",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observable, non-fatal condition routed to the same sink as events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(Severity::Debug, message)
    }

    pub fn happy(message: impl Into<String>) -> Self {
        Self::new(Severity::Happy, message)
    }

    /// Emit the diagnostic as a tracing event at the matching level.
    pub fn emit(&self) {
        let severity = self.severity.as_str();
        match self.severity {
            Severity::Severe | Severity::Error => {
                tracing::error!(severity, message = %self.message, "diagnostic")
            }
            Severity::Warning => tracing::warn!(severity, message = %self.message, "diagnostic"),
            Severity::Info | Severity::Happy => {
                tracing::info!(severity, message = %self.message, "diagnostic")
            }
            Severity::Debug => tracing::debug!(severity, message = %self.message, "diagnostic"),
            Severity::Trace => tracing::trace!(severity, message = %self.message, "diagnostic"),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

use crate::diagnostics::{Diagnostic, Severity};
use crate::error::ParseError;
use crate::record::{Payload, RawRecord};
use serde::Deserialize;
use serde_json::Value;

/// Everything decoded from one text frame.
#[derive(Debug, Default)]
pub struct FrameBatch {
    pub records: Vec<RawRecord>,
    /// Log notices pushed by the upstream server.
    pub notices: Vec<Diagnostic>,
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(default, alias = "source")]
    topic: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    partition: Option<Lenient>,
    #[serde(default)]
    offset: Option<Lenient>,
    #[serde(default)]
    timestamp: Option<Lenient>,
}

/// Numbers arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    fn into_i64(self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(n),
            Self::Float(f) if f.is_finite() => Some(f as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireNotice {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl From<WireRecord> for RawRecord {
    fn from(wire: WireRecord) -> Self {
        // A string value is raw text that may itself hold JSON.
        let (value, payload) = match wire.value {
            Value::String(text) => {
                let payload = Payload::parse(&text);
                (text, payload)
            }
            Value::Null => (String::new(), Payload::Absent),
            other => (other.to_string(), Payload::from_value(other)),
        };

        Self {
            topic: wire.topic,
            key: wire.key,
            value,
            payload,
            partition: wire.partition.and_then(Lenient::into_i64),
            offset: wire.offset.and_then(Lenient::into_i64),
            timestamp: wire.timestamp.and_then(Lenient::into_i64),
        }
    }
}

enum Line {
    Record(RawRecord),
    Notices(Vec<Diagnostic>),
}

/// Decode a newline-delimited frame. Blank lines are skipped and a line
/// that fails to decode is reported without affecting the rest.
pub fn parse_frame(text: &str) -> FrameBatch {
    let mut batch = FrameBatch::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_line(line) {
            Ok(Line::Record(record)) => batch.records.push(record),
            Ok(Line::Notices(notices)) => batch.notices.extend(notices),
            Err(err) => batch.errors.push(err),
        }
    }

    batch
}

fn parse_line(line: &str) -> Result<Line, ParseError> {
    let err = |source| ParseError {
        line: line.to_string(),
        source,
    };

    let value: Value = serde_json::from_str(line).map_err(err)?;

    if let Value::Array(items) = value {
        let notices: Vec<WireNotice> = serde_json::from_value(Value::Array(items)).map_err(err)?;
        return Ok(Line::Notices(
            notices
                .into_iter()
                .filter_map(|n| {
                    let text = n.text?;
                    let severity = n.color.as_deref().map_or(Severity::Info, Severity::from_color);
                    Some(Diagnostic::new(severity, text))
                })
                .collect(),
        ));
    }

    let wire: WireRecord = serde_json::from_value(value).map_err(err)?;
    Ok(Line::Record(wire.into()))
}

use serde_json::Value;

/// Parsed shape of a record's value, resolved once when the record is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// Empty, `null`, `[]`, or not structured data at all.
    #[default]
    Absent,
    Single(Value),
    Many(Vec<Value>),
}

impl Payload {
    /// Classify raw value text. Text that is not JSON yields `Absent`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Absent;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::Absent,
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Array(items) if items.is_empty() => Self::Absent,
            Value::Array(items) => Self::Many(items),
            other => Self::Single(other),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The payload as one JSON value, for pretty-print attachment.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Single(value) => Some(value.clone()),
            Self::Many(items) => Some(Value::Array(items.clone())),
        }
    }

    /// Walk a field path into the payload.
    ///
    /// Numeric segments index arrays. On `Many`, a leading numeric segment picks
    /// the element; any other leading segment addresses the first element.
    pub fn lookup(&self, path: &[String]) -> Option<&Value> {
        let (root, rest) = match self {
            Self::Absent => return None,
            Self::Single(value) => (value, path),
            Self::Many(items) => match path.first().and_then(|s| s.parse::<usize>().ok()) {
                Some(index) => (items.get(index)?, &path[1..]),
                None => (items.first()?, path),
            },
        };

        rest.iter().try_fold(root, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

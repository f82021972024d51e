use crate::record::RawRecord;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated '{{{{' in template '{template}'")]
    Unterminated { template: String },

    #[error("unknown field reference '{reference}' in template '{template}'")]
    UnknownField { reference: String, template: String },
}

/// A record field addressed by a template reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    Topic,
    Key,
    /// The raw value text when the path is empty, a payload lookup otherwise.
    Value(Vec<String>),
    Partition,
    Offset,
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Field(FieldRef),
}

/// Literal text with embedded `{{ ... }}` field references.
///
/// Supported references: `.Topic` (alias `.Source`), `.Key`, `.Value`,
/// `.Value.a.b`, `index .Value "a" 0`, `.Partition`, `.Offset` and
/// `.Timestamp`. Root names are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut parts = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                parts.push(Part::Literal(rest[..open].to_string()));
            }

            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                return Err(TemplateError::Unterminated {
                    template: template.to_string(),
                });
            };

            let field = parse_reference(after[..close].trim()).ok_or_else(|| {
                TemplateError::UnknownField {
                    reference: after[..close].trim().to_string(),
                    template: template.to_string(),
                }
            })?;
            parts.push(Part::Field(field));

            rest = &after[close + 2..];
        }

        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The template text when it holds no field references.
    pub fn literal(&self) -> Option<&str> {
        self.parts
            .iter()
            .all(|p| matches!(p, Part::Literal(_)))
            .then_some(self.source.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render against a record. Unresolvable references render empty.
    pub fn render(&self, record: &RawRecord) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Field(field) => render_field(field, record, &mut out),
            }
        }
        out
    }
}

fn render_field(field: &FieldRef, record: &RawRecord, out: &mut String) {
    match field {
        FieldRef::Topic => out.push_str(&record.topic),
        FieldRef::Key => out.push_str(&record.key),
        FieldRef::Value(path) if path.is_empty() => out.push_str(&record.value),
        FieldRef::Value(path) => {
            if let Some(value) = record.payload.lookup(path) {
                render_value(value, out);
            }
        }
        FieldRef::Partition => push_number(record.partition, out),
        FieldRef::Offset => push_number(record.offset, out),
        FieldRef::Timestamp => push_number(record.timestamp, out),
    }
}

fn push_number(value: Option<i64>, out: &mut String) {
    if let Some(n) = value {
        out.push_str(&n.to_string());
    }
}

fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

//-----------------------------------------------------------------------------
// Reference parsing
//-----------------------------------------------------------------------------

fn parse_reference(expr: &str) -> Option<FieldRef> {
    let tokens = tokenize(expr)?;
    match tokens.as_slice() {
        [single] => parse_path(single),
        [head, target, keys @ ..] if head == "index" && !keys.is_empty() => {
            match parse_path(target)? {
                FieldRef::Value(mut path) => {
                    path.extend(keys.iter().cloned());
                    Some(FieldRef::Value(path))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn parse_path(path: &str) -> Option<FieldRef> {
    let path = path.strip_prefix('.')?;
    let mut segments = path.split('.');
    let root = segments.next()?.to_ascii_lowercase();
    let rest: Vec<String> = segments.map(str::to_string).collect();

    if rest.iter().any(String::is_empty) {
        return None;
    }

    let field = match root.as_str() {
        "value" => return Some(FieldRef::Value(rest)),
        "topic" | "source" => FieldRef::Topic,
        "key" => FieldRef::Key,
        "partition" => FieldRef::Partition,
        "offset" => FieldRef::Offset,
        "timestamp" => FieldRef::Timestamp,
        _ => return None,
    };

    rest.is_empty().then_some(field)
}

/// Split on whitespace, keeping double-quoted strings whole (quotes removed).
fn tokenize(expr: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                token.push(c);
            }
            if !closed {
                return None;
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    Some(tokens)
}

use crate::matcher::Template;
use crate::pipeline::{EventType, VisualEvent};
use crate::record::RawRecord;
use regex::Regex;
use smallvec::SmallVec;

/// One `(field, pattern)` pair of a rule.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub field: Template,
    pub pattern: Regex,
}

impl CompiledPattern {
    pub fn matches(&self, record: &RawRecord) -> bool {
        self.pattern.is_match(&self.field.render(record))
    }
}

#[derive(Debug, Clone)]
pub struct CompiledEventTemplate {
    pub event_type: Template,
    pub source_id: Template,
    pub target_id: Template,
    pub text: Template,
    pub color: Template,
    pub fsm_id: Template,
    pub fsm_id_alias: Template,
    pub aggregate: bool,
    pub no_parse: bool,
}

impl CompiledEventTemplate {
    /// Resolve against a record. `None` when the event type does not render
    /// to a known type.
    pub fn resolve(&self, record: &RawRecord) -> Option<VisualEvent> {
        let rendered = self.event_type.render(record);
        let event_type = match rendered.parse::<EventType>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, template = self.event_type.as_str(), "event dropped");
                return None;
            }
        };

        let mut event = VisualEvent::new(event_type).aggregated(self.aggregate);
        event.source_id = render_optional(&self.source_id, record);
        event.target_id = render_optional(&self.target_id, record);
        event.text = render_optional(&self.text, record);
        event.color = render_optional(&self.color, record);
        event.fsm_id = render_optional(&self.fsm_id, record);
        event.fsm_id_alias = render_optional(&self.fsm_id_alias, record);
        event.key = (!record.key.is_empty()).then(|| record.key.clone());

        if !self.no_parse {
            event.json = record.payload.to_json();
        }

        Some(event)
    }
}

fn render_optional(template: &Template, record: &RawRecord) -> Option<String> {
    let rendered = template.render(record);
    (!rendered.is_empty()).then_some(rendered)
}

/// A conjunction of patterns and the events it produces.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub index: usize,
    pub patterns: SmallVec<[CompiledPattern; 4]>,
    pub events: SmallVec<[CompiledEventTemplate; 2]>,
}

impl CompiledRule {
    pub fn matches(&self, record: &RawRecord) -> bool {
        self.patterns.iter().all(|p| p.matches(record))
    }

    pub fn resolve<'a>(
        &'a self,
        record: &'a RawRecord,
    ) -> impl Iterator<Item = VisualEvent> + 'a {
        self.events.iter().filter_map(move |t| t.resolve(record))
    }
}

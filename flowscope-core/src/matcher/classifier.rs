use crate::matcher::RuleEngine;
use crate::pipeline::VisualEvent;
use crate::record::RawRecord;

/// Maps one record to the events it produces.
///
/// Implementations must be deterministic and free of side effects: the same
/// record always yields the same list, whatever was classified before it.
pub trait Classifier: Send + Sync {
    fn classify(&self, record: &RawRecord) -> Vec<VisualEvent>;
}

impl Classifier for RuleEngine {
    /// Every matching rule fires, in declaration order.
    fn classify(&self, record: &RawRecord) -> Vec<VisualEvent> {
        self.rules()
            .iter()
            .filter(|rule| rule.matches(record))
            .flat_map(|rule| rule.resolve(record))
            .collect()
    }
}

/// A classifier backed by an arbitrary function.
pub struct FnClassifier<F> {
    f: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&RawRecord) -> Vec<VisualEvent> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&RawRecord) -> Vec<VisualEvent> + Send + Sync,
{
    fn classify(&self, record: &RawRecord) -> Vec<VisualEvent> {
        (self.f)(record)
    }
}

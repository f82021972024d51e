mod classifier;
mod engine;
mod rule;
mod template;

#[cfg(test)]
mod tests;

pub use classifier::{Classifier, FnClassifier};
pub use engine::RuleEngine;
pub use rule::{CompiledEventTemplate, CompiledPattern, CompiledRule};
pub use template::{FieldRef, Template, TemplateError};

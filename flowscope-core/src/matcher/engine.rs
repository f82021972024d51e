use crate::conf::{
    ConfigError, EventTemplateConfig, RuleConfig, ValidationCtx, ValidationErrors,
};
use crate::matcher::{CompiledEventTemplate, CompiledPattern, CompiledRule, Template};
use crate::pipeline::EventType;
use regex::Regex;
use smallvec::SmallVec;

/// The declarative rule list, compiled once at startup.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// Compile every rule, collecting all errors instead of stopping at the
    /// first one.
    pub fn compile(rules: &[RuleConfig]) -> Result<Self, ValidationErrors> {
        let mut ctx = ValidationCtx::default();
        let engine = Self::compile_with(rules, &mut ctx);
        ctx.into_result()?;
        Ok(engine)
    }

    /// Compile what compiles and report the rest into `ctx`.
    pub(crate) fn compile_with(rules: &[RuleConfig], ctx: &mut ValidationCtx) -> Self {
        let compiled = rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| compile_rule(index, rule, ctx))
            .collect();

        Self { rules: compiled }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile_rule(index: usize, rule: &RuleConfig, ctx: &mut ValidationCtx) -> Option<CompiledRule> {
    if rule.patterns.is_empty() {
        ctx.error(ConfigError::EmptyRulePatterns { rule: index });
    }
    if rule.events.is_empty() {
        ctx.error(ConfigError::EmptyRuleEvents { rule: index });
    }

    let mut ok = true;

    let mut patterns = SmallVec::new();
    for (p, cfg) in rule.patterns.iter().enumerate() {
        let field = template(ctx, &format!("rules[{index}].patterns[{p}].field"), &cfg.field);
        let pattern = match Regex::new(&cfg.pattern) {
            Ok(re) => Some(re),
            Err(source) => {
                ctx.error(ConfigError::InvalidPattern {
                    rule: index,
                    pattern: cfg.pattern.clone(),
                    source,
                });
                None
            }
        };

        match (field, pattern) {
            (Some(field), Some(pattern)) => patterns.push(CompiledPattern { field, pattern }),
            _ => ok = false,
        }
    }

    let mut events = SmallVec::new();
    for (e, cfg) in rule.events.iter().enumerate() {
        match compile_event(ctx, &format!("rules[{index}].events[{e}]"), cfg) {
            Some(event) => events.push(event),
            None => ok = false,
        }
    }

    (ok && !patterns.is_empty() && !events.is_empty()).then_some(CompiledRule {
        index,
        patterns,
        events,
    })
}

fn compile_event(
    ctx: &mut ValidationCtx,
    location: &str,
    cfg: &EventTemplateConfig,
) -> Option<CompiledEventTemplate> {
    let event_type = template(ctx, &format!("{location}.event_type"), &cfg.event_type);

    // A literal type can be checked now; a templated one is checked per record.
    let literal = event_type.as_ref().and_then(Template::literal);
    if let Some(literal) = literal.filter(|t| t.parse::<EventType>().is_err()) {
        ctx.error(ConfigError::InvalidEventType {
            location: location.to_string(),
            value: literal.to_string(),
        });
        return None;
    }

    let source_id = template(ctx, &format!("{location}.source_id"), &cfg.source_id);
    let target_id = template(ctx, &format!("{location}.target_id"), &cfg.target_id);
    let text = template(ctx, &format!("{location}.text"), &cfg.text);
    let color = template(ctx, &format!("{location}.color"), &cfg.color);
    let fsm_id = template(ctx, &format!("{location}.fsm_id"), &cfg.fsm_id);
    let fsm_id_alias = template(ctx, &format!("{location}.fsm_id_alias"), &cfg.fsm_id_alias);

    Some(CompiledEventTemplate {
        event_type: event_type?,
        source_id: source_id?,
        target_id: target_id?,
        text: text?,
        color: color?,
        fsm_id: fsm_id?,
        fsm_id_alias: fsm_id_alias?,
        aggregate: cfg.aggregate,
        no_parse: cfg.no_parse,
    })
}

fn template(ctx: &mut ValidationCtx, location: &str, text: &str) -> Option<Template> {
    match Template::parse(text) {
        Ok(t) => Some(t),
        Err(source) => {
            ctx.error(ConfigError::InvalidTemplate {
                location: location.to_string(),
                source,
            });
            None
        }
    }
}

use crate::conf::validate::{
    validate_channel, validate_components, validate_rule_components, validate_session,
    validate_steps,
};
use crate::conf::{ConfigError, FlowConfig, RuntimeConfig, ValidationCtx};
use crate::matcher::RuleEngine;
use crate::pipeline::VisualEvent;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub fn load_config(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let text = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let parsed = parse_config(path, &text)?;

    compile_config(parsed)
}

pub fn parse_config(path: &Path, text: &str) -> Result<FlowConfig, ConfigError> {
    hcl::from_str(text).map_err(|e| ConfigError::parse(path, e))
}

/// Validate and compile a parsed configuration, aggregating all semantic
/// errors into one `ConfigError::Validation`.
pub fn compile_config(cfg: FlowConfig) -> Result<RuntimeConfig, ConfigError> {
    let mut ctx = ValidationCtx::default();

    validate_session(&cfg.session, &mut ctx);
    if let Some(channel) = &cfg.channel {
        validate_channel(channel, &mut ctx);
    }

    let components = validate_components(&cfg.components, &mut ctx);
    validate_rule_components(&cfg.rules, &components, &mut ctx);
    validate_steps(&cfg.steps, &components, &mut ctx);

    let engine = RuleEngine::compile_with(&cfg.rules, &mut ctx);

    ctx.into_result()?;

    let steps: Vec<Vec<VisualEvent>> = cfg
        .steps
        .into_iter()
        .map(|step| step.events.into_iter().map(VisualEvent::from).collect())
        .collect();

    tracing::debug!(
        rules = engine.len(),
        components = cfg.components.len(),
        steps = steps.len(),
        "configuration compiled"
    );

    Ok(RuntimeConfig {
        title: cfg.title,
        session: cfg.session,
        channel: cfg.channel,
        components: cfg.components,
        engine: Arc::new(engine),
        steps,
        fsm_id: cfg.fsm_id,
    })
}

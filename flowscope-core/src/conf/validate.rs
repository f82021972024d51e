use crate::conf::{
    ChannelConfig, ComponentConfig, ConfigError, EventTemplateConfig, ReconnectKind, RuleConfig,
    SessionConfig, StepConfig, ValidationCtx,
};
use crate::matcher::Template;
use std::collections::HashSet;

/// Validate session timing.
pub fn validate_session(session: &SessionConfig, ctx: &mut ValidationCtx) {
    if session.event_separation_interval_ms == 0 {
        ctx.error(ConfigError::InvalidInterval {
            field: "session.event_separation_interval_ms",
        });
    }

    if session.rate_calculation_interval_ms == 0 {
        ctx.error(ConfigError::InvalidInterval {
            field: "session.rate_calculation_interval_ms",
        });
    }

    if session.replay_capacity == 0 {
        ctx.error(ConfigError::InvalidReplayCapacity);
    }
}

/// Validate the ingestion channel and the consumer set it hands upstream.
pub fn validate_channel(channel: &ChannelConfig, ctx: &mut ValidationCtx) {
    if !(channel.url.starts_with("ws://") || channel.url.starts_with("wss://")) {
        ctx.error(ConfigError::InvalidChannelUrl {
            url: channel.url.clone(),
        });
    }

    if let Some(heartbeat) = &channel.heartbeat
        && heartbeat.interval_ms == 0
    {
        ctx.error(ConfigError::InvalidInterval {
            field: "channel.heartbeat.interval_ms",
        });
    }

    let reconnect = &channel.reconnect;
    if reconnect.policy == ReconnectKind::Backoff {
        if reconnect.initial_delay_ms == 0 {
            ctx.error(ConfigError::InvalidInterval {
                field: "channel.reconnect.initial_delay_ms",
            });
        }
        if reconnect.initial_delay_ms > reconnect.max_delay_ms {
            ctx.error(ConfigError::InvalidBackoff {
                initial_delay_ms: reconnect.initial_delay_ms,
                max_delay_ms: reconnect.max_delay_ms,
            });
        }
    }

    let Some(server) = &channel.server_config else {
        return;
    };

    let global_brokers = server.brokers.as_deref().is_some_and(|b| !b.trim().is_empty());
    for (index, consumer) in server.consumers.iter().enumerate() {
        if consumer.topic.trim().is_empty() {
            ctx.error(ConfigError::MissingConsumerTopic { consumer: index });
        }

        let own_brokers = consumer.brokers.as_deref().is_some_and(|b| !b.trim().is_empty());
        if !own_brokers && !global_brokers {
            ctx.error(ConfigError::MissingBrokers { consumer: index });
        }

        if let Some(offset) = &consumer.offset
            && !matches!(offset.as_str(), "oldest" | "newest")
            && offset.parse::<i64>().is_err()
        {
            ctx.error(ConfigError::InvalidOffset {
                consumer: index,
                offset: offset.clone(),
            });
        }
    }
}

/// Reject duplicate component ids; returns the declared set.
pub fn validate_components<'a>(
    components: &'a [ComponentConfig],
    ctx: &mut ValidationCtx,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for component in components {
        if !seen.insert(component.id.as_str()) {
            ctx.error(ConfigError::DuplicateComponent {
                id: component.id.clone(),
            });
        }
    }
    seen
}

/// Literal message endpoints must name declared components. Templated ids
/// are only known per record and are not checked.
pub fn validate_rule_components(
    rules: &[RuleConfig],
    components: &HashSet<&str>,
    ctx: &mut ValidationCtx,
) {
    if components.is_empty() {
        return;
    }

    for (r, rule) in rules.iter().enumerate() {
        for (e, event) in rule.events.iter().enumerate() {
            if !is_message_template(event) {
                continue;
            }
            let location = format!("rules[{r}].events[{e}]");
            check_endpoint(&location, "source_id", &event.source_id, components, ctx);
            check_endpoint(&location, "target_id", &event.target_id, components, ctx);
        }
    }
}

fn is_message_template(event: &EventTemplateConfig) -> bool {
    event.event_type.trim() == "message"
}

fn check_endpoint(
    location: &str,
    field: &str,
    text: &str,
    components: &HashSet<&str>,
    ctx: &mut ValidationCtx,
) {
    let Ok(template) = Template::parse(text) else {
        return;
    };

    if let Some(id) = template.literal()
        && !id.is_empty()
        && !components.contains(id)
    {
        ctx.error(ConfigError::UnknownComponent {
            location: format!("{location}.{field}"),
            component: id.to_string(),
        });
    }
}

/// Recorded steps must carry events and reference declared components.
pub fn validate_steps(steps: &[StepConfig], components: &HashSet<&str>, ctx: &mut ValidationCtx) {
    for (s, step) in steps.iter().enumerate() {
        if step.events.is_empty() {
            ctx.error(ConfigError::EmptyStep { step: s });
        }

        if components.is_empty() {
            continue;
        }

        for (e, event) in step.events.iter().enumerate() {
            for (field, id) in [("source_id", &event.source_id), ("target_id", &event.target_id)] {
                if let Some(id) = id
                    && !components.contains(id.as_str())
                {
                    ctx.error(ConfigError::UnknownComponent {
                        location: format!("steps[{s}].events[{e}].{field}"),
                        component: id.clone(),
                    });
                }
            }
        }
    }
}

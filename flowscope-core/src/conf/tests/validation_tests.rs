use crate::conf::{
    ChannelConfig, ComponentConfig, ConfigError, ConsumerConfig, EventTemplateConfig, FlowConfig,
    PatternConfig, ReconnectConfig, ReconnectKind, RuleConfig, ServerConfig, SessionConfig,
    StepConfig, compile_config,
};

fn validation_errors(cfg: FlowConfig) -> Vec<ConfigError> {
    match compile_config(cfg) {
        Err(ConfigError::Validation { validation_errors }) => validation_errors,
        Err(other) => panic!("expected a validation error, got {other}"),
        Ok(_) => panic!("expected a validation error"),
    }
}

fn channel(url: &str) -> ChannelConfig {
    ChannelConfig {
        url: url.to_string(),
        heartbeat: None,
        reconnect: ReconnectConfig::default(),
        server_config: None,
    }
}

fn message_rule(source: &str, target: &str) -> RuleConfig {
    RuleConfig {
        patterns: vec![PatternConfig {
            field: "{{.Topic}}".to_string(),
            pattern: "orders".to_string(),
        }],
        events: vec![EventTemplateConfig {
            event_type: "message".to_string(),
            source_id: source.to_string(),
            target_id: target.to_string(),
            ..EventTemplateConfig::default()
        }],
    }
}

#[test]
fn empty_config_is_valid() {
    let cfg = compile_config(FlowConfig::default()).unwrap();

    assert!(cfg.engine.is_empty());
    assert!(cfg.channel.is_none());
}

#[test]
fn all_errors_are_reported_together() {
    // Arrange
    let cfg = FlowConfig {
        session: SessionConfig {
            event_separation_interval_ms: 0,
            replay_capacity: 0,
            ..SessionConfig::default()
        },
        channel: Some(channel("http://localhost")),
        rules: vec![RuleConfig::default()],
        ..FlowConfig::default()
    };

    // Act
    let errors = validation_errors(cfg);

    // Assert
    assert_eq!(errors.len(), 5);
    assert!(matches!(errors[0], ConfigError::InvalidInterval { .. }));
    assert!(matches!(errors[1], ConfigError::InvalidReplayCapacity));
    assert!(matches!(errors[2], ConfigError::InvalidChannelUrl { .. }));
    assert!(matches!(errors[3], ConfigError::EmptyRulePatterns { rule: 0 }));
    assert!(matches!(errors[4], ConfigError::EmptyRuleEvents { rule: 0 }));
}

#[test]
fn bad_pattern_and_template_are_rejected() {
    // Arrange
    let mut rule = message_rule("A", "B");
    rule.patterns[0].pattern = "(".to_string();
    rule.events[0].text = "{{.Value".to_string();

    // Act
    let errors = validation_errors(FlowConfig {
        rules: vec![rule],
        ..FlowConfig::default()
    });

    // Assert
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ConfigError::InvalidPattern { rule: 0, .. }));
    assert!(matches!(errors[1], ConfigError::InvalidTemplate { .. }));
}

#[test]
fn literal_event_type_is_checked() {
    let mut rule = message_rule("A", "B");
    rule.events[0].event_type = "animation".to_string();

    let errors = validation_errors(FlowConfig {
        rules: vec![rule],
        ..FlowConfig::default()
    });

    assert!(matches!(
        &errors[0],
        ConfigError::InvalidEventType { value, .. } if value == "animation"
    ));
}

#[test]
fn literal_endpoints_must_be_declared_components() {
    // Arrange
    let cfg = FlowConfig {
        components: vec![
            ComponentConfig { id: "A".to_string() },
            ComponentConfig { id: "A".to_string() },
        ],
        rules: vec![message_rule("A", "Z"), message_rule("A", "{{.Key}}")],
        ..FlowConfig::default()
    };

    // Act
    let errors = validation_errors(cfg);

    // Assert
    assert_eq!(errors.len(), 2);
    assert!(matches!(&errors[0], ConfigError::DuplicateComponent { id } if id == "A"));
    assert!(matches!(
        &errors[1],
        ConfigError::UnknownComponent { component, .. } if component == "Z"
    ));
}

#[test]
fn empty_steps_are_rejected() {
    let errors = validation_errors(FlowConfig {
        steps: vec![StepConfig::default()],
        ..FlowConfig::default()
    });

    assert!(matches!(errors[0], ConfigError::EmptyStep { step: 0 }));
}

#[test]
fn consumers_need_topic_brokers_and_a_known_offset() {
    // Arrange
    let mut cfg = channel("ws://localhost:9000/ws");
    cfg.server_config = Some(ServerConfig {
        brokers: None,
        consumers: vec![
            ConsumerConfig {
                brokers: Some("kafka:9092".to_string()),
                offset: Some("42".to_string()),
                topic: "ok".to_string(),
                ..ConsumerConfig::default()
            },
            ConsumerConfig {
                offset: Some("latest".to_string()),
                ..ConsumerConfig::default()
            },
        ],
    });

    // Act
    let errors = validation_errors(FlowConfig {
        channel: Some(cfg),
        ..FlowConfig::default()
    });

    // Assert
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], ConfigError::MissingConsumerTopic { consumer: 1 }));
    assert!(matches!(errors[1], ConfigError::MissingBrokers { consumer: 1 }));
    assert!(matches!(errors[2], ConfigError::InvalidOffset { consumer: 1, .. }));
}

#[test]
fn backoff_delays_must_be_ordered() {
    let mut cfg = channel("wss://example.com/ws");
    cfg.reconnect = ReconnectConfig {
        policy: ReconnectKind::Backoff,
        initial_delay_ms: 5_000,
        max_delay_ms: 1_000,
        max_attempts: Some(3),
    };

    let errors = validation_errors(FlowConfig {
        channel: Some(cfg),
        ..FlowConfig::default()
    });

    assert!(matches!(
        errors[0],
        ConfigError::InvalidBackoff {
            initial_delay_ms: 5_000,
            max_delay_ms: 1_000
        }
    ));
}

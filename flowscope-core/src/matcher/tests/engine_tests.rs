use crate::conf::{ConfigError, EventTemplateConfig, PatternConfig, RuleConfig};
use crate::matcher::{Classifier, FnClassifier, RuleEngine};
use crate::pipeline::{EventType, PendingQueue, VisualEvent, fold};
use crate::record::RawRecord;
use pretty_assertions::assert_eq;

fn pattern(field: &str, pattern: &str) -> PatternConfig {
    PatternConfig {
        field: field.to_string(),
        pattern: pattern.to_string(),
    }
}

fn message(source: &str, target: &str) -> EventTemplateConfig {
    EventTemplateConfig {
        event_type: "message".to_string(),
        source_id: source.to_string(),
        target_id: target.to_string(),
        ..EventTemplateConfig::default()
    }
}

fn rule(patterns: Vec<PatternConfig>, events: Vec<EventTemplateConfig>) -> RuleConfig {
    RuleConfig { patterns, events }
}

#[test]
fn matching_burst_folds_to_a_single_counted_entry() {
    // Arrange
    let engine = RuleEngine::compile(&[rule(
        vec![pattern("{{.Topic}}", "^requests$")],
        vec![EventTemplateConfig {
            aggregate: true,
            ..message("A", "B")
        }],
    )])
    .unwrap();
    let records = vec![RawRecord::new("requests", "same", ""); 3];
    let mut queue = PendingQueue::new();

    // Act
    for record in &records {
        for event in engine.classify(record) {
            fold(event, &mut queue);
        }
    }

    // Assert
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.iter().next().unwrap().count, 3);
}

#[test]
fn every_matching_rule_fires_in_declaration_order() {
    // Arrange
    let engine = RuleEngine::compile(&[
        rule(vec![pattern("{{.Topic}}", "orders")], vec![message("A", "B")]),
        rule(vec![pattern("{{.Key}}", "^nope$")], vec![message("X", "Y")]),
        rule(
            vec![pattern("{{.Topic}}", "^ord")],
            vec![
                message("B", "C"),
                EventTemplateConfig {
                    event_type: "log".to_string(),
                    text: "seen {{.Key}}".to_string(),
                    ..EventTemplateConfig::default()
                },
            ],
        ),
    ])
    .unwrap();

    // Act
    let events = engine.classify(&RawRecord::new("orders", "k1", ""));

    // Assert
    let kinds: Vec<_> = events
        .iter()
        .map(|e| (e.event_type, e.source_id.as_deref(), e.text.as_deref()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (EventType::Message, Some("A"), None),
            (EventType::Message, Some("B"), None),
            (EventType::Log, None, Some("seen k1")),
        ]
    );
}

#[test]
fn all_patterns_must_match() {
    let engine = RuleEngine::compile(&[rule(
        vec![pattern("{{.Topic}}", "orders"), pattern("{{.Value.status}}", "^failed$")],
        vec![message("A", "B")],
    )])
    .unwrap();

    let ok = engine.classify(&RawRecord::new("orders", "", r#"{"status":"failed"}"#));
    let other = engine.classify(&RawRecord::new("orders", "", r#"{"status":"done"}"#));

    assert_eq!(ok.len(), 1);
    assert!(other.is_empty());
}

#[test]
fn templates_resolve_and_empty_optionals_are_omitted() {
    // Arrange
    let engine = RuleEngine::compile(&[rule(
        vec![pattern("{{.Topic}}", ".")],
        vec![EventTemplateConfig {
            text: "{{.Value.msg}}".to_string(),
            fsm_id: "{{.Value.fsm}}".to_string(),
            color: "{{.Value.color}}".to_string(),
            ..message("{{.Value.from}}", "B")
        }],
    )])
    .unwrap();
    let record = RawRecord::new("t", "key-1", r#"{"from":"A","msg":"hello","fsm":"f-1"}"#);

    // Act
    let events = engine.classify(&record);

    // Assert
    let event = &events[0];
    assert_eq!(event.source_id.as_deref(), Some("A"));
    assert_eq!(event.text.as_deref(), Some("hello"));
    assert_eq!(event.fsm_id.as_deref(), Some("f-1"));
    assert_eq!(event.color, None);
    assert_eq!(event.key.as_deref(), Some("key-1"));
    assert!(event.json.is_some());
}

#[test]
fn unparseable_payload_only_drops_the_json_attachment() {
    let engine = RuleEngine::compile(&[rule(
        vec![pattern("{{.Topic}}", ".")],
        vec![message("A", "B")],
    )])
    .unwrap();

    let events = engine.classify(&RawRecord::new("t", "", "<xml/>"));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].json, None);
}

#[test]
fn no_parse_skips_the_json_attachment() {
    let engine = RuleEngine::compile(&[rule(
        vec![pattern("{{.Topic}}", ".")],
        vec![EventTemplateConfig {
            no_parse: true,
            ..message("A", "B")
        }],
    )])
    .unwrap();

    let events = engine.classify(&RawRecord::new("t", "", r#"{"a":1}"#));

    assert_eq!(events[0].json, None);
}

#[test]
fn templated_event_type_that_renders_unknown_is_dropped() {
    let engine = RuleEngine::compile(&[rule(
        vec![pattern("{{.Topic}}", ".")],
        vec![EventTemplateConfig {
            event_type: "{{.Value.kind}}".to_string(),
            text: "x".to_string(),
            ..EventTemplateConfig::default()
        }],
    )])
    .unwrap();

    let log = engine.classify(&RawRecord::new("t", "", r#"{"kind":"log"}"#));
    let unknown = engine.classify(&RawRecord::new("t", "", r#"{"kind":"banner"}"#));

    assert_eq!(log.len(), 1);
    assert!(unknown.is_empty());
}

#[test]
fn compile_aggregates_every_error() {
    // Arrange
    let rules = [
        rule(Vec::new(), vec![message("A", "B")]),
        rule(vec![pattern("{{.Topic}}", "(")], Vec::new()),
        rule(
            vec![pattern("{{.Bogus}}", "x")],
            vec![EventTemplateConfig {
                event_type: "banner".to_string(),
                ..EventTemplateConfig::default()
            }],
        ),
    ];

    // Act
    let errors = RuleEngine::compile(&rules).unwrap_err().0;

    // Assert
    assert_eq!(errors.len(), 5);
    assert!(matches!(errors[0], ConfigError::EmptyRulePatterns { rule: 0 }));
    assert!(matches!(errors[1], ConfigError::EmptyRuleEvents { rule: 1 }));
    assert!(matches!(errors[2], ConfigError::InvalidPattern { rule: 1, .. }));
    assert!(matches!(errors[3], ConfigError::InvalidTemplate { .. }));
    assert!(matches!(errors[4], ConfigError::InvalidEventType { .. }));
}

#[test]
fn function_classifier_is_a_drop_in_strategy() {
    let classifier = FnClassifier::new(|record: &RawRecord| {
        vec![VisualEvent::log(format!("{}:{}", record.topic, record.key))]
    });

    let events = classifier.classify(&RawRecord::new("t", "k", ""));

    assert_eq!(events, vec![VisualEvent::log("t:k")]);
}

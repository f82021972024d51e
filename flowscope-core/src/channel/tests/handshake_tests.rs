use crate::channel::{handshake_payload, resolve_server_config};
use crate::conf::{ConsumerConfig, ServerConfig};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn server() -> ServerConfig {
    ServerConfig {
        brokers: Some("kafka-1:9092,kafka-2:9092".to_string()),
        consumers: vec![
            ConsumerConfig {
                topic: "requests".to_string(),
                ..ConsumerConfig::default()
            },
            ConsumerConfig {
                brokers: Some("other:9092".to_string()),
                partition: Some(3),
                topic: "replies".to_string(),
                offset: Some("oldest".to_string()),
            },
        ],
    }
}

#[test]
fn consumers_inherit_defaults() {
    // Act
    let resolved = resolve_server_config(&server());

    // Assert
    let first = &resolved.consumers[0];
    assert_eq!(first.brokers.as_deref(), Some("kafka-1:9092,kafka-2:9092"));
    assert_eq!(first.partition, Some(-1));
    assert_eq!(first.offset.as_deref(), Some("newest"));

    let second = &resolved.consumers[1];
    assert_eq!(second, &server().consumers[1]);
}

#[test]
fn payload_is_the_resolved_config_as_json() {
    // Act
    let payload = handshake_payload(&server()).unwrap();

    // Assert
    let value: Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(
        value,
        json!({
            "brokers": "kafka-1:9092,kafka-2:9092",
            "consumers": [
                {
                    "brokers": "kafka-1:9092,kafka-2:9092",
                    "partition": -1,
                    "topic": "requests",
                    "offset": "newest"
                },
                {
                    "brokers": "other:9092",
                    "partition": 3,
                    "topic": "replies",
                    "offset": "oldest"
                }
            ]
        })
    );
}

use crate::conf::{ConsumerConfig, ServerConfig};
use crate::error::ChannelError;

const DEFAULT_OFFSET: &str = "newest";
const ALL_PARTITIONS: i32 = -1;

/// Fill in what the upstream would otherwise assume: every consumer gets
/// its own broker list, an offset policy and a partition.
pub fn resolve_server_config(server: &ServerConfig) -> ServerConfig {
    let consumers = server
        .consumers
        .iter()
        .map(|consumer| ConsumerConfig {
            brokers: consumer.brokers.clone().or_else(|| server.brokers.clone()),
            partition: Some(consumer.partition.unwrap_or(ALL_PARTITIONS)),
            topic: consumer.topic.clone(),
            offset: Some(
                consumer
                    .offset
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OFFSET.to_string()),
            ),
        })
        .collect();

    ServerConfig {
        brokers: server.brokers.clone(),
        consumers,
    }
}

/// The frame sent once after the channel opens.
pub fn handshake_payload(server: &ServerConfig) -> Result<String, ChannelError> {
    serde_json::to_string(&resolve_server_config(server)).map_err(|source| ChannelError::Encode {
        what: "server configuration",
        source,
    })
}

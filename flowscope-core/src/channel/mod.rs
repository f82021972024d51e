mod client;
mod handshake;
mod heartbeat;
mod reconnect;

#[cfg(test)]
mod tests;

pub use client::{ChannelEvent, run_channel};
pub use handshake::{handshake_payload, resolve_server_config};
pub use heartbeat::Heartbeat;
pub use reconnect::ReconnectPolicy;

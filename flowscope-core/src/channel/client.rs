use crate::channel::{Heartbeat, ReconnectPolicy, handshake_payload};
use crate::conf::{ChannelConfig, ServerConfig};
use crate::diagnostics::Diagnostic;
use crate::error::ChannelError;
use crate::record::{FrameBatch, parse_frame};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the ingestion adapter hands to the runtime.
#[derive(Debug)]
pub enum ChannelEvent {
    /// One decoded text frame.
    Batch(FrameBatch),
    Diagnostic(Diagnostic),
}

enum Disconnect {
    Shutdown,
    Dropped,
}

/// Ingest from the configured websocket until shutdown.
///
/// Every connect, send and receive failure is reported as a diagnostic. The
/// reconnect policy decides whether to try again; with `Never` the adapter
/// returns after the first failure and the session stays in its mode.
pub async fn run_channel(
    cfg: ChannelConfig,
    tx: mpsc::Sender<ChannelEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let policy = ReconnectPolicy::from(&cfg.reconnect);
    let heartbeat = cfg.heartbeat.as_ref().map(Heartbeat::from);
    let mut attempt = 0u32;

    loop {
        if *shutdown.borrow() {
            return;
        }

        match connect_async(cfg.url.as_str()).await {
            Ok((socket, _)) => {
                attempt = 0;
                report(&tx, Diagnostic::happy(format!("WebSocket open on [{}]!", cfg.url))).await;

                let outcome = serve(socket, &cfg, heartbeat.as_ref(), &tx, &mut shutdown).await;
                if let Disconnect::Shutdown = outcome {
                    return;
                }
            }
            Err(e) => {
                let err = ChannelError::connect(&cfg.url, e);
                tracing::error!(error = %err, "channel connect failed");
                report(&tx, Diagnostic::error(err.to_string())).await;
            }
        }

        attempt += 1;
        let Some(delay) = policy.delay(attempt) else {
            tracing::info!(url = %cfg.url, attempt, "channel not retried");
            return;
        };

        tracing::info!(url = %cfg.url, attempt, delay_ms = delay.as_millis() as u64, "reconnecting");
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => return,
        }
    }
}

async fn serve(
    mut socket: Socket,
    cfg: &ChannelConfig,
    heartbeat: Option<&Heartbeat>,
    tx: &mpsc::Sender<ChannelEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> Disconnect {
    if let Some(server) = &cfg.server_config {
        send_handshake(&mut socket, server, tx).await;
    }

    let period = heartbeat.map_or(Duration::from_secs(3600), |hb| hb.interval);
    let mut beat = tokio::time::interval_at(Instant::now() + period, period);
    beat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = socket.close(None).await;
                return Disconnect::Shutdown;
            }

            _ = beat.tick(), if heartbeat.is_some() => {
                if let Some(hb) = heartbeat
                    && let Err(err) = send_heartbeat(&mut socket, hb).await
                {
                    tracing::warn!(error = %err, "heartbeat failed");
                    report(tx, Diagnostic::error(err.to_string())).await;
                }
            }

            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    forward(tx, text.as_str()).await;
                }
                Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => forward(tx, text).await,
                    Err(_) => tracing::debug!(len = bytes.len(), "binary frame ignored"),
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(url = %cfg.url, "channel closed");
                    report(tx, Diagnostic::error("WebSocket closed!")).await;
                    return Disconnect::Dropped;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let err = ChannelError::receive(e);
                    tracing::error!(error = %err, "channel receive failed");
                    report(tx, Diagnostic::error(format!("WebSocket had error! {err}"))).await;
                    return Disconnect::Dropped;
                }
            },
        }
    }
}

async fn send_handshake(
    socket: &mut Socket,
    server: &ServerConfig,
    tx: &mpsc::Sender<ChannelEvent>,
) {
    let sent = match handshake_payload(server) {
        Ok(payload) => socket
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| ChannelError::send("server configuration", e)),
        Err(err) => Err(err),
    };

    match sent {
        Ok(()) => {
            tracing::debug!(consumers = server.consumers.len(), "handshake sent");
            report(tx, Diagnostic::happy("Sent configurations to server successfully!")).await;
        }
        Err(err) => {
            tracing::error!(error = %err, "handshake failed");
            report(
                tx,
                Diagnostic::error(format!("Can't send configurations to server: {err}")),
            )
            .await;
        }
    }
}

async fn send_heartbeat(socket: &mut Socket, heartbeat: &Heartbeat) -> Result<(), ChannelError> {
    let frame = heartbeat.frame()?;
    socket
        .send(Message::Text(frame.into()))
        .await
        .map_err(|e| ChannelError::send("heartbeat", e))?;
    tracing::trace!(uuid = %heartbeat.uuid, "heartbeat sent");
    Ok(())
}

async fn forward(tx: &mpsc::Sender<ChannelEvent>, text: &str) {
    if text.trim().is_empty() {
        return;
    }

    let batch = parse_frame(text);
    tracing::trace!(
        records = batch.records.len(),
        errors = batch.errors.len(),
        "frame received"
    );
    let _ = tx.send(ChannelEvent::Batch(batch)).await;
}

async fn report(tx: &mpsc::Sender<ChannelEvent>, diagnostic: Diagnostic) {
    let _ = tx.send(ChannelEvent::Diagnostic(diagnostic)).await;
}

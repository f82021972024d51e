use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamBehavior {
    /// Keep every connection open and forward pushed frames.
    Serve,
    /// Close each connection as soon as the first frame arrives.
    CloseAfterFirstFrame,
}

/// A local websocket server standing in for the event-log upstream.
///
/// Every text frame a client sends is recorded; frames pushed with `send`
/// go to every open connection.
pub struct WsUpstream {
    url: String,
    received: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
    frames: broadcast::Sender<String>,
}

impl WsUpstream {
    pub async fn start(behavior: UpstreamBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind upstream");
        let addr = listener.local_addr().expect("upstream has no address");

        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let (frames, _) = broadcast::channel::<String>(64);

        let accept_received = received.clone();
        let accept_connections = connections.clone();
        let accept_frames = frames.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                accept_connections.fetch_add(1, Ordering::SeqCst);
                let received = accept_received.clone();
                let mut outgoing = accept_frames.subscribe();

                tokio::spawn(async move {
                    let Ok(socket) = accept_async(stream).await else {
                        return;
                    };
                    let (mut sink, mut incoming) = socket.split();

                    loop {
                        tokio::select! {
                            msg = incoming.next() => match msg {
                                Some(Ok(Message::Text(text))) => {
                                    received.lock().unwrap().push(text.as_str().to_string());
                                    if behavior == UpstreamBehavior::CloseAfterFirstFrame {
                                        let _ = sink.close().await;
                                        return;
                                    }
                                }
                                Some(Ok(_)) => {}
                                _ => return,
                            },
                            frame = outgoing.recv() => match frame {
                                Ok(frame) => {
                                    if sink.send(Message::Text(frame.into())).await.is_err() {
                                        return;
                                    }
                                }
                                Err(_) => return,
                            },
                        }
                    }
                });
            }
        });

        Self {
            url: format!("ws://{addr}/ws"),
            received,
            connections,
            frames,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Push one text frame to every connected client.
    pub fn send(&self, frame: impl Into<String>) {
        let _ = self.frames.send(frame.into());
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Poll until `pred` holds for the received frames (or panic).
    pub async fn wait_for_received(&self, pred: impl Fn(&[String]) -> bool) -> Vec<String> {
        wait_until(|| {
            let received = self.received();
            pred(&received).then_some(received)
        })
        .await
    }
}

/// Poll `probe` every 10ms for up to two seconds.
pub async fn wait_until<T>(mut probe: impl FnMut() -> Option<T>) -> T {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);

    loop {
        if let Some(value) = probe() {
            return value;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("condition not met within 2s");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

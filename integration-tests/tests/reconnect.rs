use flowscope_core::pipeline::Mode;
use integration_tests::harness::{
    TestSession, UpstreamBehavior, WsUpstream, load_fixture, patch_channel,
};
use pretty_assertions::assert_eq;

fn closed_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::test]
async fn failed_connect_is_reported_and_not_retried_by_default() {
    // Arrange
    let url = format!("ws://127.0.0.1:{}/ws", closed_port());
    let session = TestSession::start(patch_channel(load_fixture("live.hcl"), &url));

    // Act
    let error = session.wait_for_diagnostic("failed to connect").await;

    // Assert
    assert!(error.message.contains(&url));
    assert!(session.diagnostics().iter().all(|d| !d.message.contains("WebSocket open")));
    let stats = session.stop().await;
    assert_eq!(stats.mode, Mode::Live);
    assert_eq!((stats.queued, stats.replay_logged), (0, 0));
}

#[tokio::test]
async fn backoff_policy_reconnects_and_repeats_the_handshake() {
    // Arrange
    let upstream = WsUpstream::start(UpstreamBehavior::CloseAfterFirstFrame).await;
    let session = TestSession::start(patch_channel(load_fixture("reconnect.hcl"), upstream.url()));

    // Act
    let frames = upstream.wait_for_received(|frames| frames.len() >= 3).await;

    // Assert
    assert!(upstream.connections() >= 3);
    assert!(frames.iter().all(|f| f.contains(r#""topic":"requests""#)));
    session.wait_for_diagnostic("WebSocket closed!").await;

    session.stop().await;
}

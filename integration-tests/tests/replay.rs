use flowscope_core::diagnostics::Severity;
use flowscope_core::pipeline::Mode;
use flowscope_core::runtime::Control;
use integration_tests::harness::{
    TestSession, UpstreamBehavior, WsUpstream, load_fixture, patch_channel,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn replay_shows_what_live_showed_and_ignores_new_batches() {
    // Arrange
    let upstream = WsUpstream::start(UpstreamBehavior::Serve).await;
    let session = TestSession::start(patch_channel(load_fixture("live.hcl"), upstream.url()));
    upstream.wait_for_received(|frames| !frames.is_empty()).await;

    upstream.send(concat!(
        r#"{"topic": "requests", "key": "a", "value": {"id": 1}, "timestamp": 1}"#,
        "\n",
        r#"{"topic": "requests", "key": "b", "value": {"id": 2}, "timestamp": 2}"#,
        "\n",
    ));
    let live = session.wait_for_events(2).await;

    // Act
    session.control(Control::EnterReplay).await;
    session.wait_for_diagnostic("Replay event log mode").await;

    upstream.send(r#"{"topic": "requests", "key": "c", "value": {"id": 3}}"#);
    session.wait_for_diagnostic("Ignored incoming message.").await;

    session.control(Control::Advance).await;
    session.control(Control::Advance).await;
    let all = session.wait_for_events(4).await;

    // Assert
    assert_eq!(&all[2..], &live[..]);

    session.control(Control::ExitReplay).await;
    session.wait_for_diagnostic("Back to real-time mode").await;

    let stats = session.stop().await;
    assert_eq!(stats.mode, Mode::Live);
    assert_eq!(stats.discarded_batches, 1);
    assert_eq!(stats.replay_logged, 0);
}

#[tokio::test]
async fn entering_replay_without_history_is_rejected() {
    // Arrange
    let upstream = WsUpstream::start(UpstreamBehavior::Serve).await;
    let session = TestSession::start(patch_channel(load_fixture("live.hcl"), upstream.url()));

    // Act
    session.control(Control::EnterReplay).await;

    // Assert
    let rejected = session.wait_for_diagnostic("replay event log is empty").await;
    assert_eq!(rejected.severity, Severity::Error);

    let stats = session.stop().await;
    assert_eq!(stats.mode, Mode::Live);
}

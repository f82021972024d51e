use flowscope_core::pipeline::Mode;
use flowscope_core::runtime::Control;
use integration_tests::harness::{
    TestSession, UpstreamBehavior, WsUpstream, load_fixture, patch_channel,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn scripted_session_walks_steps_without_a_channel() {
    // Arrange
    let upstream = WsUpstream::start(UpstreamBehavior::Serve).await;
    let session = TestSession::start(patch_channel(load_fixture("scripted.hcl"), upstream.url()));

    // Act
    session.control(Control::Advance).await;
    let first = session.wait_for_events(1).await;

    session.control(Control::Advance).await;
    let both = session.wait_for_events(2).await;

    // Assert
    assert_eq!(first[0].source_id.as_deref(), Some("A"));
    assert_eq!(first[0].text.as_deref(), Some("hello"));

    let folded = &both[1];
    assert_eq!(folded.source_id.as_deref(), Some("B"));
    assert_eq!(folded.count, 2);
    let texts: Vec<_> = folded.logs.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["hi", "again"]);

    assert_eq!(upstream.connections(), 0);

    let stats = session.stop().await;
    assert_eq!(stats.mode, Mode::Scripted);
    assert_eq!((stats.cursor, stats.steps), (2, 2));
}

#[tokio::test]
async fn advancing_past_the_last_step_is_reported_and_reset_rewinds() {
    // Arrange
    let session = TestSession::start(load_fixture("scripted.hcl"));
    session.control(Control::Advance).await;
    session.control(Control::Advance).await;
    session.wait_for_events(2).await;

    // Act
    session.control(Control::Advance).await;
    session.wait_for_diagnostic("end of steps (2/2)").await;

    session.control(Control::Reset).await;
    session.control(Control::Advance).await;
    let events = session.wait_for_events(3).await;

    // Assert
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].text.as_deref(), Some("hello"));

    let stats = session.stop().await;
    assert_eq!(stats.cursor, 1);
}

#[tokio::test]
async fn live_only_controls_are_rejected_while_scripted() {
    // Arrange
    let session = TestSession::start(load_fixture("scripted.hcl"));

    // Act
    session.control(Control::EnterReplay).await;

    // Assert
    session.wait_for_diagnostic("cannot").await;
    let stats = session.stop().await;
    assert_eq!(stats.mode, Mode::Scripted);
}

use crate::harness::upstream::wait_until;
use flowscope_core::conf::RuntimeConfig;
use flowscope_core::diagnostics::Diagnostic;
use flowscope_core::pipeline::{SessionStats, VisualEvent};
use flowscope_core::presentation::Presenter;
use flowscope_core::runtime::{self, Control};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct RecordingPresenter {
    events: Arc<Mutex<Vec<VisualEvent>>>,
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, event: &VisualEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic.clone());
    }
}

/// Handle to a running session whose presenter records everything.
pub struct TestSession {
    presenter: RecordingPresenter,
    controls: mpsc::Sender<Control>,
    handle: JoinHandle<SessionStats>,
}

impl TestSession {
    pub fn start(cfg: RuntimeConfig) -> Self {
        let presenter = RecordingPresenter::default();
        let (controls, rx) = mpsc::channel(16);
        let handle = tokio::spawn(runtime::run(cfg, presenter.clone(), rx));

        Self {
            presenter,
            controls,
            handle,
        }
    }

    pub async fn control(&self, control: Control) {
        self.controls
            .send(control)
            .await
            .expect("session stopped unexpectedly");
    }

    pub fn events(&self) -> Vec<VisualEvent> {
        self.presenter.events.lock().unwrap().clone()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.presenter.diagnostics.lock().unwrap().clone()
    }

    /// Poll until at least `n` events were presented (or panic).
    pub async fn wait_for_events(&self, n: usize) -> Vec<VisualEvent> {
        wait_until(|| {
            let events = self.events();
            (events.len() >= n).then_some(events)
        })
        .await
    }

    /// Poll until a diagnostic containing `text` was presented (or panic).
    pub async fn wait_for_diagnostic(&self, text: &str) -> Diagnostic {
        wait_until(|| {
            self.diagnostics()
                .into_iter()
                .find(|d| d.message.contains(text))
        })
        .await
    }

    pub async fn stop(self) -> SessionStats {
        self.control(Control::Quit).await;
        self.handle.await.expect("session task panicked")
    }
}

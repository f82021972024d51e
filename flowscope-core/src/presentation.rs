use crate::diagnostics::{Diagnostic, Severity};
use crate::pipeline::{EventType, RateReport, VisualEvent};
use chrono::Local;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Receives whatever the playback scheduler dequeues, one entry per tick.
pub trait Presenter: Send {
    fn present(&mut self, event: &VisualEvent);

    fn diagnostic(&mut self, diagnostic: &Diagnostic);

    fn rate(&mut self, _report: &RateReport) {}
}

/// Writes presented events to stdout, one line per log entry.
pub struct ConsolePresenter {
    color: bool,
}

impl ConsolePresenter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn write(&self, lines: &[String]) {
        let mut out = io::stdout().lock();
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
    }
}

impl Presenter for ConsolePresenter {
    fn present(&mut self, event: &VisualEvent) {
        self.write(&render_event(event, self.color));
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        let line = paint(&diagnostic.message, diagnostic.severity, self.color);
        self.write(&[stamp(&line)]);
    }

    fn rate(&mut self, report: &RateReport) {
        self.write(&[stamp(&report.to_string())]);
    }
}

/// Render one dequeued entry: the edge header for messages, every folded log
/// line, then the payload when one was attached.
pub fn render_event(event: &VisualEvent, color: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if event.event_type == EventType::Message {
        let source = event.source_id.as_deref().unwrap_or("?");
        let target = event.target_id.as_deref().unwrap_or("?");
        let mut header = format!("{source} -> {target}");
        if event.count > 1 {
            header.push_str(&format!(" (x{})", event.count));
        }
        if let Some(key) = &event.key {
            header.push_str(&format!(" [{key}]"));
        }
        lines.push(stamp(&if color {
            header.bold().to_string()
        } else {
            header
        }));
    }

    let severity = |c: &Option<String>| c.as_deref().map_or(Severity::Info, Severity::from_color);

    if event.logs.is_empty() {
        if let Some(text) = &event.text {
            lines.push(stamp(&paint(text, severity(&event.color), color)));
        }
    } else {
        for line in &event.logs {
            let color_key = line.color.clone().or_else(|| event.color.clone());
            lines.push(stamp(&paint(&line.text, severity(&color_key), color)));
        }
    }

    if let Some(json) = &event.json
        && let Ok(pretty) = serde_json::to_string_pretty(json)
    {
        lines.extend(pretty.lines().map(|l| format!("    {l}")));
    }

    lines
}

fn stamp(line: &str) -> String {
    format!("{} {line}", Local::now().format("%H:%M:%S"))
}

fn paint(text: &str, severity: Severity, color: bool) -> String {
    if !color {
        return match severity {
            Severity::Info => text.to_string(),
            other => format!("[{other}] {text}"),
        };
    }

    match severity {
        Severity::Severe => text.red().bold().to_string(),
        Severity::Error => text.red().to_string(),
        Severity::Warning => text.yellow().to_string(),
        Severity::Info => text.to_string(),
        Severity::Trace | Severity::Debug => text.dimmed().to_string(),
        Severity::Happy => text.green().to_string(),
    }
}

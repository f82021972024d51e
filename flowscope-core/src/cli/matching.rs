use crate::conf::{RuntimeConfig, load_config};
use crate::diagnostics::Diagnostic;
use crate::pipeline::{Session, SessionSettings, VisualEvent};
use crate::record::parse_frame;
use std::io::{self, Read, Write};
use std::path::PathBuf;

pub fn run_match(path: PathBuf) -> anyhow::Result<()> {
    let cfg = load_config(&path)?;

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let (queue, diagnostics) = match_records(&cfg, &input);

    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }

    let mut out = io::stdout().lock();
    for event in &queue {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
    }
    Ok(())
}

/// Treat `input` as one live batch: decode, match and fold it, and return
/// the pending queue with every diagnostic raised on the way.
pub fn match_records(cfg: &RuntimeConfig, input: &str) -> (Vec<VisualEvent>, Vec<Diagnostic>) {
    let batch = parse_frame(input);
    let mut diagnostics: Vec<Diagnostic> = batch
        .errors
        .iter()
        .map(|err| Diagnostic::error(err.to_string()))
        .collect();
    diagnostics.extend(batch.notices);

    let mut session = Session::new(
        cfg.engine.clone(),
        SessionSettings::from(&cfg.session),
        Vec::new(),
    );
    if let Some(filter) = cfg.initial_filter() {
        session.set_filter(filter);
    }

    session.ingest(batch.records);
    diagnostics.extend(session.drain_diagnostics());

    (session.queue().iter().cloned().collect(), diagnostics)
}

#[cfg(test)]
mod tests {
    use super::match_records;
    use crate::conf::{compile_config, parse_config};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    const RULES: &str = r#"
rules = [
  {
    patterns = [{ field = "{{.Topic}}", pattern = "^requests$" }]
    events = [
      { event_type = "message", source_id = "A", target_id = "B", text = "{{.Key}}", aggregate = true }
    ]
  }
]
"#;

    #[test]
    fn batch_is_sorted_matched_and_folded() {
        // Arrange
        let cfg = compile_config(parse_config(Path::new("rules.hcl"), RULES).unwrap()).unwrap();
        let input = concat!(
            r#"{"topic": "requests", "key": "second", "timestamp": 2000}"#,
            "\n",
            r#"{"topic": "requests", "key": "first", "timestamp": 1000}"#,
            "\n",
            "garbage\n",
            r#"{"topic": "other", "key": "x"}"#,
            "\n",
        );

        // Act
        let (queue, diagnostics) = match_records(&cfg, input);

        // Assert
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].count, 2);
        let logs: Vec<_> = queue[0].logs.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(logs, vec!["first", "second"]);
        assert_eq!(diagnostics.len(), 2);
    }
}

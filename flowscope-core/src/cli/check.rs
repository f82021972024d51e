use crate::conf::{ConfigError, load_config};
use crate::pipeline::Mode;
use miette::Report;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            let mode = if cfg.steps.is_empty() {
                Mode::Live
            } else {
                Mode::Scripted
            };

            println!("✔ Config loaded successfully");
            println!("✔ {} rules", cfg.engine.len());
            println!("✔ {} components", cfg.components.len());
            println!("✔ {} steps", cfg.steps.len());
            println!("✔ starts in {mode} mode");
            if let Some(channel) = &cfg.channel {
                println!("✔ channel {}", channel.url);
            }
            Ok(())
        }
        Err(err) => {
            print_config_error(err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: ConfigError, plain: bool) {
    let hints = config_error_hints(&err);
    if plain {
        eprintln!("{}", err);
        if let ConfigError::Validation { validation_errors } = &err {
            for e in validation_errors {
                eprintln!("  - {e}");
            }
        }
    } else {
        eprintln!();
        eprintln!("{:?}", Report::new(err));
    }
    for hint in hints {
        eprintln!();
        eprintln!("{}", hint);
    }
}

/// Hints for every distinct kind of error, in first-seen order.
fn config_error_hints(err: &ConfigError) -> Vec<&'static str> {
    let mut hints = Vec::new();
    let mut push = |hint: Option<&'static str>| {
        if let Some(hint) = hint
            && !hints.contains(&hint)
        {
            hints.push(hint);
        }
    };

    match err {
        ConfigError::Validation { validation_errors } => {
            validation_errors.iter().for_each(|e| push(config_error_hint(e)));
        }
        other => push(config_error_hint(other)),
    }

    hints
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Rules
        //---------------------------------------------------------------------
        ConfigError::EmptyRulePatterns { .. } | ConfigError::EmptyRuleEvents { .. } => Some(
            "Rules need at least one pattern and one event.\n\
             \n\
             Example:\n\
             \n\
             rules = [\n\
             \x20 {\n\
             \x20   patterns = [{ field = \"{{.Topic}}\", pattern = \"^requests$\" }]\n\
             \x20   events   = [{ event_type = \"message\", source_id = \"A\", target_id = \"B\" }]\n\
             \x20 }\n\
             ]",
        ),

        ConfigError::InvalidPattern { .. } => Some(
            "Patterns are regular expressions matched against the rendered field.\n\
             \n\
             Escape special characters, e.g. \"order\\\\.created\".",
        ),

        ConfigError::InvalidTemplate { .. } => Some(
            "Field references look like {{.Topic}}, {{.Key}}, {{.Value}}, {{.Value.a.b}},\n\
             {{index .Value \"a\"}}, {{.Partition}}, {{.Offset}} or {{.Timestamp}}.",
        ),

        ConfigError::InvalidEventType { .. } => {
            Some("event_type must be \"message\" or \"log\".")
        }

        //---------------------------------------------------------------------
        // Components
        //---------------------------------------------------------------------
        ConfigError::UnknownComponent { .. } => Some(
            "Message endpoints must be declared as components.\n\
             \n\
             Example:\n\
             \n\
             components = [{ id = \"A\" }, { id = \"B\" }]",
        ),

        //---------------------------------------------------------------------
        // Channel
        //---------------------------------------------------------------------
        ConfigError::InvalidChannelUrl { .. } => Some(
            "The channel is a websocket.\n\
             \n\
             Example:\n\
             \n\
             channel = {\n\
             \x20 url = \"ws://localhost:41234/ws\"\n\
             }",
        ),

        ConfigError::MissingBrokers { .. } => Some(
            "Set `brokers` on the consumer or on server_config.\n\
             \n\
             Example:\n\
             \n\
             server_config = {\n\
             \x20 brokers   = \"localhost:9092\"\n\
             \x20 consumers = [{ topic = \"requests\" }]\n\
             }",
        ),

        ConfigError::InvalidBackoff { .. } => Some(
            "The first reconnect delay cannot be longer than the maximum delay.",
        ),

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}

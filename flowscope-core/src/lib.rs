pub mod channel;
pub mod cli;
pub mod conf;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod pipeline;
pub mod presentation;
pub mod record;
pub mod runtime;

use crate::conf::ConfigError;
use miette::Diagnostic;
use thiserror::Error;

/// Collects validation errors so a single pass reports all of them.
#[derive(Default)]
pub struct ValidationCtx {
    errors: Vec<ConfigError>,
}

impl ValidationCtx {
    pub fn error(&mut self, err: ConfigError) {
        self.errors.push(err);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("configuration validation failed")]
pub struct ValidationErrors(#[related] pub Vec<ConfigError>);

mod error;
mod loader;
mod runtime;
mod types;
mod validate;
mod validation_ctx;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use loader::{compile_config, load_config, parse_config};
pub use runtime::RuntimeConfig;
pub use types::*;
pub use validation_ctx::{ValidationCtx, ValidationErrors};

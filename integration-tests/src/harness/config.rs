use flowscope_core::conf::{RuntimeConfig, load_config};
use std::path::PathBuf;

/// Load a fixture config from `fixtures/config/<file>`.
pub fn load_fixture(file: &str) -> RuntimeConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("config")
        .join(file);

    assert!(path.exists(), "fixture config does not exist: {:?}", path);

    load_config(&path).expect("failed to load fixture config")
}

/// Point the fixture's channel at a test upstream.
pub fn patch_channel(mut cfg: RuntimeConfig, url: &str) -> RuntimeConfig {
    let channel = cfg
        .channel
        .as_mut()
        .expect("fixture config has no channel");
    channel.url = url.to_string();
    cfg
}

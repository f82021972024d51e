mod config;
pub mod session;
pub mod tracing;
pub mod upstream;

pub use config::{load_fixture, patch_channel};
pub use session::TestSession;
pub use self::tracing::{CapturedEvent, init_test_tracing};
pub use upstream::{UpstreamBehavior, WsUpstream};

mod aggregator;
mod alias;
mod event;
mod filter;
mod mode;
mod queue;
mod rate;
mod replay;
mod session;

#[cfg(test)]
mod tests;

pub use aggregator::fold;
pub use alias::AliasResolver;
pub use event::{EventType, LogLine, UnknownEventType, VisualEvent};
pub use filter::Filter;
pub use mode::{Mode, ModeController};
pub use queue::PendingQueue;
pub use rate::{RateEstimator, RateReport, throughput};
pub use replay::{DEFAULT_REPLAY_CAPACITY, ReplayLog};
pub use session::{Session, SessionSettings, SessionStats};

mod control;
mod event_loop;

#[cfg(test)]
mod tests;

pub use control::{Control, UnknownControl, stdin_controls};
pub use event_loop::run;

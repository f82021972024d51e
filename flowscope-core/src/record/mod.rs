mod frame;
mod payload;
mod raw_record;

#[cfg(test)]
mod tests;

pub use frame::{FrameBatch, parse_frame};
pub use payload::Payload;
pub use raw_record::{RawRecord, sort_by_timestamp};

// Engine module - pure merge logic over in-memory records.
// Reading and writing files is the io layer's job; this crate never touches disk.

pub mod aggregate;
pub mod classify;
pub mod merge;

pub use aggregate::aggregate_summaries;
pub use classify::{SessionData, extract_session_data};
pub use merge::{MergedSession, OtherEventsPolicy, merge_session_data, sort_messages};

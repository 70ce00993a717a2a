// NOTE: agmerge in one paragraph
//
// A resumed agent session leaves one `session_<id>.jsonl` per restart. `agmerge`
// folds those fragments back into a single session file: messages from every
// fragment, re-stamped with a fresh id and ordered by their own timestamps,
// between a new start marker and a new summary/end pair whose statistics are
// the sum of the fragments' summaries. Input files are never modified.

mod args;
mod commands;
mod handlers;
pub mod logging;
pub mod presentation;
pub mod types;

pub use args::Cli;
pub use commands::run;

// Error types
pub mod error;

// Fragment file naming convention
pub mod naming;

// Directory scanning and start-time ordering
pub mod discovery;

// Tolerant JSONL reading
pub mod reader;

// Atomic JSONL writing
pub mod writer;

pub use discovery::{SessionFiles, discover_session_files};
pub use error::{Error, Result};
pub use naming::{
    FragmentRole, classify_file_name, primary_file_name, raw_file_name, session_id_from_file_name,
    session_id_from_path,
};
pub use reader::{
    LineError, ParsedLog, parse_records, read_session_log, read_session_records, read_start_time,
};
pub use writer::{session_output_path, write_records, write_session};

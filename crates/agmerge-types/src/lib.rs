pub mod error;
pub mod kind;
pub mod record;
pub mod summary;
pub mod timestamp;

pub use error::{Error, Result};
pub use kind::*;
pub use record::*;
pub use summary::*;
pub use timestamp::*;

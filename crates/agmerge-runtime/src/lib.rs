pub mod config;
pub mod error;
pub mod merge_service;

pub use config::{CONFIG_ENV, Config, ConfigLocation, MergeConfig, resolve_config_path};
pub use error::{Error, Result};
pub use merge_service::{MIN_FRAGMENTS, MergeOptions, MergeOutcome, MergeReport, MergeService};

pub use agmerge_engine::OtherEventsPolicy;

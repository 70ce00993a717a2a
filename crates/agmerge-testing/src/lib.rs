//! Testing infrastructure for agmerge tests.
//!
//! This crate provides utilities for writing robust tests:
//! - `TestWorld`: isolated log directory plus CLI execution
//! - `fixtures`: fragment file construction
//! - `assertions`: checks over merged output files

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::FragmentBuilder;
pub use world::{CliResult, TestWorld};

//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated log directory
//! - Placing session fragments (and raw companions) in it
//! - Executing the CLI against it with an isolated config

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::assertions;
use crate::fixtures::FragmentBuilder;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use agmerge_testing::{FragmentBuilder, TestWorld};
///
/// let world = TestWorld::new()
///     .with_fragment(FragmentBuilder::new("a").start("2025-01-01T10:00:00Z"))
///     .with_fragment(FragmentBuilder::new("b").start("2025-01-01T11:00:00Z"));
///
/// let result = world.run_merge(&[]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    log_dir: PathBuf,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log_dir = temp_dir.path().join("logs");
        let config_path = temp_dir.path().join("config.toml");

        std::fs::create_dir_all(&log_dir).expect("Failed to create log dir");

        Self {
            temp_dir,
            log_dir,
            config_path,
            env_vars: HashMap::new(),
        }
    }

    /// Directory holding the session fragments.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config file the CLI is pointed at (through `AGMERGE_CONFIG`).
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Place a fragment in the log directory.
    pub fn with_fragment(self, fragment: FragmentBuilder) -> Self {
        fragment
            .write_to(&self.log_dir)
            .expect("Failed to write fragment");
        self
    }

    /// Place a fragment together with its raw companion.
    pub fn with_fragment_and_raw(self, fragment: FragmentBuilder) -> Self {
        fragment
            .write_raw_companion(&self.log_dir)
            .expect("Failed to write raw companion");
        self.with_fragment(fragment)
    }

    /// Write the config file used by CLI runs.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// `session_*.jsonl` files currently in the log directory, sorted by name.
    pub fn session_files(&self) -> Result<Vec<PathBuf>> {
        assertions::session_files(&self.log_dir)
    }

    /// Files in the log directory that are not in `before`.
    pub fn new_session_files(&self, before: &[PathBuf]) -> Result<Vec<PathBuf>> {
        Ok(self
            .session_files()?
            .into_iter()
            .filter(|path| !before.contains(path))
            .collect())
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.current_dir(self.temp_dir.path())
            .env("AGMERGE_CONFIG", &self.config_path)
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the binary with `args` and return the result.
    ///
    /// # Note
    /// This method uses `Command::cargo_bin()` which requires the binary to be
    /// built, which cargo test does automatically for the CLI crate's tests.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("agmerge")
            .map_err(|e| anyhow::anyhow!("Failed to find agmerge binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run a merge of the log directory, with extra flags placed before it.
    pub fn run_merge(&self, flags: &[&str]) -> Result<CliResult> {
        let log_dir = self.log_dir.to_string_lossy().to_string();
        let mut args: Vec<&str> = flags.to_vec();
        args.push(&log_dir);
        self.run(&args)
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

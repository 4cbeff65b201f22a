use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Test harness for running CLI commands in an isolated working directory
pub struct CliTestHarness {
    temp_dir: TempDir,
}

impl CliTestHarness {
    /// Create a new test harness with an empty working directory
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Create a harness whose working directory holds a `cadence.toml`
    pub fn with_config(contents: &str) -> Self {
        let harness = Self::new();
        std::fs::write(harness.dir().join("cadence.toml"), contents)
            .expect("Failed to write config file");
        harness
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");

        cmd.current_dir(self.dir());
        for key in ["CADENCE_LOCALE", "CADENCE_LOG_LEVEL", "CADENCE_TABLE", "RUST_LOG"] {
            cmd.env_remove(key);
        }
        cmd.env("CADENCE_TIMEZONE", "UTC");

        cmd
    }

    /// Get the working directory for this test instance
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Helper to run a command and return its stdout
    pub fn stdout_of(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        String::from_utf8(output).expect("stdout is not UTF-8")
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const START: &'static str = "2023-10-01T00:00:00Z";

    /// Arguments expanding a weekday rule from a Sunday
    pub fn weekday_expand_args() -> Vec<&'static str> {
        vec!["expand", "FREQ=DAILY;COUNT=7;BYDAY=MO,WE", "--start", Self::START]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check for a reported error
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error:")
    }

    /// Predicate to check if output contains occurrence table headers
    pub fn has_occurrence_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Occurrence")
            .and(predicate::str::contains("Weekday"))
            .and(predicate::str::contains("Day of Year"))
    }
}

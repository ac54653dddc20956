//! The test-runner seam.
//!
//! Producing a profile is the job of the language's own test tool;
//! invoking it belongs to a thin collaborator outside this crate. The
//! orchestrator only needs the seam, taken by value so tests can
//! substitute a fake that writes a canned profile.

use crate::errors::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Package patterns to run tests for; empty means the whole project.
    pub packages: Vec<String>,
}

pub trait TestRunner: Send + Sync {
    /// Run the project's tests with coverage enabled and return the
    /// path of the profile that was written.
    fn run(&self, opts: &RunOptions) -> Result<PathBuf>;
}

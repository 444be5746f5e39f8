//! Best-effort version-control hook for the CSV store.
//!
//! After a successful local write the store may hand the file to a
//! [`PostWriteHook`]. Hook failure is logged and swallowed: the local write
//! already succeeded and a failed commit or push must never propagate.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;

use condwatch_core::types::DATETIME_FORMAT;

/// Invoked after a store file has been written successfully.
pub trait PostWriteHook: Send + Sync {
    /// Best-effort; implementations must not fail the write path.
    fn after_write(&self, file: &Path);
}

/// Commits and pushes the written file in a local git checkout.
pub struct GitHook {
    repo_dir: PathBuf,
}

impl GitHook {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Run one git subcommand in the checkout, logging failures at warn.
    ///
    /// Returns whether the command exited successfully so later steps can be
    /// skipped (no point pushing after a failed commit).
    fn run(&self, args: &[&str]) -> bool {
        match Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
        {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                tracing::warn!(
                    args = ?args,
                    status = ?output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "git command failed; continuing without version control"
                );
                false
            }
            Err(e) => {
                tracing::warn!(args = ?args, error = %e, "git could not be spawned");
                false
            }
        }
    }
}

impl PostWriteHook for GitHook {
    fn after_write(&self, file: &Path) {
        let file = file.to_string_lossy();
        if !self.run(&["add", file.as_ref()]) {
            return;
        }
        let message = format!(
            "Update measurement data - {}",
            Local::now().format(DATETIME_FORMAT)
        );
        // An empty commit (no changes staged) also lands here; that is fine.
        if !self.run(&["commit", "-m", &message]) {
            return;
        }
        self.run(&["push"]);
    }
}

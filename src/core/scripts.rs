//! External script execution
//!
//! The release flow treats install/lint/test/deploy as opaque commands. They
//! run synchronously with inherited stdio so their output lands straight on
//! the operator's terminal; a non-zero exit is fatal to the release.

use crate::core::error::{ReleaseResult, ScriptError};
use std::path::PathBuf;
use std::process::Command;

/// Runs named external commands, surfacing success or failure
pub trait ScriptRunner {
  /// Execute `script` to completion
  fn run(&self, script: &str) -> ReleaseResult<()>;
}

/// Production runner executing scripts through `sh -c`
pub struct ShellRunner {
  cwd: PathBuf,
}

impl ShellRunner {
  pub fn new(cwd: impl Into<PathBuf>) -> Self {
    Self { cwd: cwd.into() }
  }
}

impl ScriptRunner for ShellRunner {
  fn run(&self, script: &str) -> ReleaseResult<()> {
    println!("\n▶ Running `{}`", script);

    let status = Command::new("sh")
      .arg("-c")
      .arg(script)
      .current_dir(&self.cwd)
      .status()
      .map_err(|e| ScriptError::Spawn {
        script: script.to_string(),
        reason: e.to_string(),
      })?;

    if !status.success() {
      return Err(
        ScriptError::Failed {
          script: script.to_string(),
          code: status.code(),
        }
        .into(),
      );
    }

    Ok(())
  }
}

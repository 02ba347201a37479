//! Error types for release-train with contextual messages
//!
//! Every failure in the release flow is fatal at the point of detection: the
//! error is carried up to `main`, printed with a suggestion where we have one,
//! and the process exits non-zero. Nothing here is caught and retried.

use crate::core::vcs::Branch;
use std::fmt;
use std::io;

/// Main error type for release-train
#[derive(Debug)]
pub enum ReleaseError {
  /// Git operation errors
  Git(GitError),

  /// Branch synchronization errors (pre/post release)
  Sync(SyncError),

  /// External script errors (install, lint, test, deploy)
  Script(ScriptError),

  /// Version manifest errors
  Version(VersionError),

  /// The CLI argument matched neither release token set
  UnrecognizedArgument { arg: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message { message: String, context: Option<String> },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
      },
      other => other,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::Sync(e) => e.help_message(),
      ReleaseError::Script(e) => e.help_message(),
      ReleaseError::UnrecognizedArgument { .. } => Some(format!(
        "Accepted release arguments: {}",
        crate::release::RELEASE_TOKENS
          .iter()
          .chain(crate::release::PRERELEASE_TOKENS)
          .copied()
          .collect::<Vec<_>>()
          .join(", ")
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Sync(e) => write!(f, "{}", e),
      ReleaseError::Script(e) => write!(f, "{}", e),
      ReleaseError::Version(e) => write!(f, "{}", e),
      ReleaseError::UnrecognizedArgument { arg } => {
        write!(f, "Unrecognized release argument: '{}'", arg)
      }
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<GitError> for ReleaseError {
  fn from(err: GitError) -> Self {
    ReleaseError::Git(err)
  }
}

impl From<SyncError> for ReleaseError {
  fn from(err: SyncError) -> Self {
    ReleaseError::Sync(err)
  }
}

impl From<ScriptError> for ReleaseError {
  fn from(err: ScriptError) -> Self {
    ReleaseError::Script(err)
  }
}

impl From<VersionError> for ReleaseError {
  fn from(err: VersionError) -> Self {
    ReleaseError::Version(err)
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// git itself could not be invoked
  Unavailable { reason: String },

  /// Working directory is not inside a git repository
  RepoNotFound { reason: String },

  /// Checkout failed (dirty tree, unknown branch)
  CheckoutFailed { branch: Branch, stderr: String },

  /// Pull with rebase failed
  PullFailed {
    remote: String,
    branch: Branch,
    stderr: String,
  },

  /// Push of a branch or of tags failed
  PushFailed {
    remote: String,
    refspec: String,
    stderr: String,
  },

  /// Any other git command failed
  CommandFailed { command: String, stderr: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::Unavailable { .. } => Some("Make sure git is installed and on PATH.".to_string()),
      GitError::RepoNotFound { .. } => {
        Some("Run release-train from inside the working copy you want to release.".to_string())
      }
      GitError::PushFailed { stderr, .. } => {
        if stderr.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Re-run once the branches are synchronized.".to_string())
        } else if stderr.contains("permission denied") || stderr.contains("403") {
          Some("Check your SSH key permissions and remote access.".to_string())
        } else {
          None
        }
      }
      GitError::CheckoutFailed { branch, .. } => Some(format!(
        "Make sure the '{}' branch exists locally and the tree is clean.",
        branch
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::Unavailable { reason } => {
        write!(f, "Failed to invoke git: {}", reason)
      }
      GitError::RepoNotFound { reason } => {
        write!(f, "Not a git repository: {}", reason)
      }
      GitError::CheckoutFailed { branch, stderr } => {
        write!(f, "Checkout of '{}' failed:\n{}", branch, stderr)
      }
      GitError::PullFailed { remote, branch, stderr } => {
        write!(f, "Pull --rebase of '{}' from '{}' failed:\n{}", branch, remote, stderr)
      }
      GitError::PushFailed { remote, refspec, stderr } => {
        write!(f, "Push of {} to '{}' failed:\n{}", refspec, remote, stderr)
      }
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
    }
  }
}

/// Branch synchronization errors
#[derive(Debug)]
pub enum SyncError {
  /// Uncommitted changes present before synchronization
  DirtyWorkingTree { files: usize },

  /// A local branch has commits its tracking branch does not
  LocalAheadOfRemote {
    branch: String,
    ahead: u32,
    tracking: String,
  },

  /// Rebase stopped on a textual conflict; the rebase has been aborted
  RebaseConflict { branch: Branch, onto: Branch },

  /// Rebase failed for a reason other than a conflict
  RebaseFailed {
    branch: Branch,
    onto: Branch,
    reason: String,
  },
}

impl SyncError {
  fn help_message(&self) -> Option<String> {
    match self {
      SyncError::DirtyWorkingTree { .. } => Some("Commit or stash your changes, then re-run the release.".to_string()),
      SyncError::LocalAheadOfRemote { branch, tracking, .. } => Some(format!(
        "Push or drop the local commits on '{}' so it matches {}, then re-run.",
        branch, tracking
      )),
      SyncError::RebaseConflict { branch, onto } => Some(format!(
        "Resolve manually: git rebase {} {}, fix the conflicts, push, then re-run.",
        onto, branch
      )),
      SyncError::RebaseFailed { .. } => None,
    }
  }
}

impl fmt::Display for SyncError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SyncError::DirtyWorkingTree { files } => {
        write!(f, "You have {} uncommitted change(s)", files)
      }
      SyncError::LocalAheadOfRemote { branch, ahead, tracking } => {
        write!(f, "Your local '{}' is {} commit(s) ahead of {}", branch, ahead, tracking)
      }
      SyncError::RebaseConflict { branch, onto } => {
        write!(
          f,
          "Rebase of '{}' onto '{}' hit a conflict (the rebase was aborted)",
          branch, onto
        )
      }
      SyncError::RebaseFailed { branch, onto, reason } => {
        write!(f, "Rebase of '{}' onto '{}' failed:\n{}", branch, onto, reason)
      }
    }
  }
}

/// External script errors
#[derive(Debug)]
pub enum ScriptError {
  /// The script could not be spawned at all
  Spawn { script: String, reason: String },

  /// The script ran and exited non-zero
  Failed { script: String, code: Option<i32> },
}

impl ScriptError {
  fn help_message(&self) -> Option<String> {
    match self {
      ScriptError::Failed { script, .. } => Some(format!(
        "The working tree was left as-is. Fix what `{}` reported and re-run the release.",
        script
      )),
      ScriptError::Spawn { .. } => None,
    }
  }
}

impl fmt::Display for ScriptError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ScriptError::Spawn { script, reason } => {
        write!(f, "Failed to execute script `{}`: {}", script, reason)
      }
      ScriptError::Failed { script, code } => {
        write!(f, "Script `{}` failed with exit code {}", script, code.unwrap_or(-1))
      }
    }
  }
}

/// Version manifest errors
#[derive(Debug)]
pub enum VersionError {
  /// Manifest file could not be read
  ManifestRead { path: String, reason: String },

  /// Manifest is not valid TOML
  ManifestParse { path: String, reason: String },

  /// Manifest has no `[package] version` entry
  MissingVersion { path: String },

  /// Version string is not valid semver
  InvalidVersion { raw: String, reason: String },
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::ManifestRead { path, reason } => {
        write!(f, "Failed to read manifest {}: {}", path, reason)
      }
      VersionError::ManifestParse { path, reason } => {
        write!(f, "Failed to parse manifest {}: {}", path, reason)
      }
      VersionError::MissingVersion { path } => {
        write!(f, "No [package] version in manifest {}", path)
      }
      VersionError::InvalidVersion { raw, reason } => {
        write!(f, "Invalid semver version '{}': {}", raw, reason)
      }
    }
  }
}

/// Result type alias for release-train
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

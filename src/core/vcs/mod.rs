//! Version control abstraction for the release flow
//!
//! The release engine only ever talks to git through the [`Vcs`] trait so the
//! branch choreography can be exercised against a scripted fake in tests.
//! [`SystemGit`] is the production implementation over system git.

pub mod system_git;


pub use system_git::SystemGit;

use crate::core::error::ReleaseResult;
use std::fmt;

/// The two long-lived branches that participate in the release flow.
///
/// No other branch is ever touched by the automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
  Develop,
  Master,
}

impl Branch {
  /// The branch name as git knows it
  pub fn as_str(self) -> &'static str {
    match self {
      Branch::Develop => "develop",
      Branch::Master => "master",
    }
  }
}

impl fmt::Display for Branch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Snapshot of the repository state, produced fresh by every `status()` call.
///
/// Never cached: git state changes under us with every step we take.
#[derive(Debug, Clone)]
pub struct RepositoryStatus {
  /// Currently checked out branch
  pub branch: String,
  /// Remote tracking branch, e.g. `origin/develop`
  pub tracking: Option<String>,
  /// Commits the local branch has that the tracking branch does not
  pub ahead: u32,
  /// Commits the tracking branch has that the local branch does not
  pub behind: u32,
  /// Modified, staged and untracked files in the working tree
  pub files: usize,
}

/// Result of a rebase attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseOutcome {
  /// Fast-forward or successful replay
  Clean,
  /// Rebase stopped on textual conflicts; caller must abort
  Conflict,
  /// Rebase failed for another reason (carries tool output)
  OtherFailure(String),
}

/// Capability interface over the version control system.
///
/// Every operation shells out and blocks until the underlying tool returns.
/// A `rebase` that returns [`RebaseOutcome::Conflict`] leaves the repository
/// mid-rebase; the caller owns the paired `abort_rebase` so the tree always
/// ends up in its pre-rebase state.
pub trait Vcs {
  /// Query branch, ahead/behind counts and working tree cleanliness
  fn status(&self) -> ReleaseResult<RepositoryStatus>;

  /// Check out one of the release branches
  fn checkout(&self, branch: Branch) -> ReleaseResult<()>;

  /// Pull `branch` from `remote` with rebase semantics
  fn pull_rebase(&self, remote: &str, branch: Branch) -> ReleaseResult<()>;

  /// Replay `branch`'s commits on top of `onto`'s tip
  fn rebase(&self, onto: Branch, branch: Branch) -> ReleaseResult<RebaseOutcome>;

  /// Abort an in-progress rebase, restoring the pre-rebase state
  fn abort_rebase(&self) -> ReleaseResult<()>;

  /// Push a branch to the remote
  fn push(&self, remote: &str, branch: Branch) -> ReleaseResult<()>;

  /// Push all tags to the remote
  fn push_tags(&self, remote: &str) -> ReleaseResult<()>;

  /// Stage all tracked changes and commit them
  fn commit_all(&self, message: &str) -> ReleaseResult<()>;

  /// Create an annotated tag at HEAD
  fn tag(&self, name: &str, message: &str) -> ReleaseResult<()>;
}

//! Branch synchronization against the remote
//!
//! Brings `develop` (and, for full releases, `master`) to a remote-consistent
//! state before any build step runs, and propagates the version commit and
//! tags back afterwards. Ordering rules enforced here:
//!
//! - No branch is mutated while the working tree is dirty.
//! - A branch ahead of its tracking branch is a hard stop: un-pushed local
//!   commits are never silently rewritten or pushed.
//! - `master` is rebased onto `develop` before versioning so the bump commit
//!   lands on top of all develop work and the later push fast-forwards.
//! - A rebase conflict aborts the rebase before failing, leaving the tree in
//!   its pre-rebase state. This is the only automatic recovery in the flow.

use crate::core::error::{ReleaseResult, SyncError};
use crate::core::vcs::{Branch, RebaseOutcome, Vcs};
use crate::release::ReleaseKind;

/// Synchronizes the two release branches with the remote
pub struct Synchronizer<'a, V: Vcs> {
  vcs: &'a V,
  remote: String,
}

impl<'a, V: Vcs> Synchronizer<'a, V> {
  pub fn new(vcs: &'a V, remote: impl Into<String>) -> Self {
    Self {
      vcs,
      remote: remote.into(),
    }
  }

  /// Update the local repository from the remote before the release starts.
  ///
  /// - `develop` only for a prerelease
  /// - `develop` and `master`, then `master` rebased onto `develop`, for a
  ///   full release
  pub fn prepare_local_repository(&self, kind: ReleaseKind) -> ReleaseResult<()> {
    let status = self.vcs.status()?;

    if status.files > 0 {
      return Err(SyncError::DirtyWorkingTree { files: status.files }.into());
    }

    println!("🔄 Updating local branches...");
    self.update_branch(Branch::Develop)?;

    if kind == ReleaseKind::Release {
      self.update_branch(Branch::Master)?;
      self.rebase_branches(Branch::Develop, Branch::Master)?;
    }

    Ok(())
  }

  /// Update the remote after the version commit and tag exist locally.
  ///
  /// For a full release: push `master`, push tags, rebase `develop` onto the
  /// now-tagged `master`, push `develop`. For a prerelease: push `develop`
  /// and tags. Each push failure names the sub-step that did not complete; a
  /// partial publish is surfaced, never papered over.
  pub fn finish_release(&self, kind: ReleaseKind) -> ReleaseResult<()> {
    println!("🔄 Updating repository after release...");

    match kind {
      ReleaseKind::Release => {
        self.vcs.push(&self.remote, Branch::Master)?;
        println!("   pushed master to {}", self.remote);
        self.vcs.push_tags(&self.remote)?;
        println!("   pushed tags to {}", self.remote);
        self.rebase_branches(Branch::Master, Branch::Develop)?;
        self.vcs.push(&self.remote, Branch::Develop)?;
        println!("   pushed develop to {}", self.remote);
      }
      ReleaseKind::Prerelease => {
        self.vcs.push(&self.remote, Branch::Develop)?;
        println!("   pushed develop to {}", self.remote);
        self.vcs.push_tags(&self.remote)?;
        println!("   pushed tags to {}", self.remote);
      }
    }

    Ok(())
  }

  /// Check out `branch` and bring it level with its tracking branch.
  ///
  /// Ahead of the remote is a hard stop; behind means pull with rebase
  /// semantics; level is a no-op.
  fn update_branch(&self, branch: Branch) -> ReleaseResult<()> {
    self.vcs.checkout(branch)?;
    let status = self.vcs.status()?;

    if status.ahead > 0 {
      return Err(
        SyncError::LocalAheadOfRemote {
          branch: status.branch.clone(),
          ahead: status.ahead,
          tracking: status
            .tracking
            .unwrap_or_else(|| format!("{}/{}", self.remote, branch)),
        }
        .into(),
      );
    }

    if status.behind > 0 {
      self.vcs.pull_rebase(&self.remote, branch)?;
      println!("   {} has been updated", branch);
    } else {
      println!("   {} is up to date", branch);
    }

    Ok(())
  }

  /// Replay `branch` on top of `onto`, aborting on conflict
  fn rebase_branches(&self, onto: Branch, branch: Branch) -> ReleaseResult<()> {
    match self.vcs.rebase(onto, branch)? {
      RebaseOutcome::Clean => {
        println!("   rebased {} onto {}", branch, onto);
        Ok(())
      }
      RebaseOutcome::Conflict => {
        self.vcs.abort_rebase()?;
        Err(SyncError::RebaseConflict { branch, onto }.into())
      }
      RebaseOutcome::OtherFailure(reason) => Err(SyncError::RebaseFailed { branch, onto, reason }.into()),
    }
  }
}

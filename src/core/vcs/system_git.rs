//! System git backend - zero dependencies
//!
//! Shells out to git plumbing and porcelain commands. Status is read with
//! `git status --porcelain=v2 --branch` so branch, ahead/behind counts and the
//! dirty-file count come from one subprocess call, and subprocesses run with an
//! isolated environment (only PATH and HOME survive).

use crate::core::error::{GitError, ReleaseResult};
use crate::core::vcs::{Branch, RebaseOutcome, RepositoryStatus, Vcs};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// Performs one subprocess call to confirm `path` is inside a working copy.
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .map_err(|e| GitError::Unavailable { reason: e.to_string() })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(GitError::RepoNotFound { reason: stderr }.into());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Self {
      repo_path: PathBuf::from(stdout.trim()),
    })
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Forces safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Run a git subcommand, mapping spawn failures to `GitError::Unavailable`
  fn run(&self, args: &[&str]) -> ReleaseResult<Output> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .map_err(|e| GitError::Unavailable { reason: e.to_string() })?;
    Ok(output)
  }

  /// True when a rebase is currently in progress.
  ///
  /// Structured conflict signal: git keeps its rebase state in the
  /// `rebase-merge` or `rebase-apply` directories while stopped on conflicts.
  fn rebase_in_progress(&self) -> Option<bool> {
    let mut seen_any = false;
    for dir in ["rebase-merge", "rebase-apply"] {
      let output = self.run(&["rev-parse", "--git-path", dir]).ok()?;
      if !output.status.success() {
        continue;
      }
      seen_any = true;
      let path = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
      let resolved = if path.is_absolute() {
        path
      } else {
        self.repo_path.join(path)
      };
      if resolved.exists() {
        return Some(true);
      }
    }
    if seen_any { Some(false) } else { None }
  }
}

impl Vcs for SystemGit {
  fn status(&self) -> ReleaseResult<RepositoryStatus> {
    let output = self.run(&["status", "--porcelain=v2", "--branch"])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(
        GitError::CommandFailed {
          command: "git status --porcelain=v2 --branch".to_string(),
          stderr,
        }
        .into(),
      );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_porcelain_status(&stdout))
  }

  fn checkout(&self, branch: Branch) -> ReleaseResult<()> {
    let output = self.run(&["checkout", branch.as_str()])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(GitError::CheckoutFailed { branch, stderr }.into());
    }

    Ok(())
  }

  fn pull_rebase(&self, remote: &str, branch: Branch) -> ReleaseResult<()> {
    let output = self.run(&["pull", "--rebase", remote, branch.as_str()])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(
        GitError::PullFailed {
          remote: remote.to_string(),
          branch,
          stderr,
        }
        .into(),
      );
    }

    Ok(())
  }

  fn rebase(&self, onto: Branch, branch: Branch) -> ReleaseResult<RebaseOutcome> {
    let output = self.run(&["rebase", onto.as_str(), branch.as_str()])?;

    if output.status.success() {
      return Ok(RebaseOutcome::Clean);
    }

    // Prefer the on-disk rebase state over scanning the tool output; the
    // CONFLICT substring is a last resort when the state can't be checked.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let conflicted = match self.rebase_in_progress() {
      Some(in_progress) => in_progress,
      None => stdout.contains("CONFLICT") || stderr.contains("CONFLICT"),
    };

    if conflicted {
      Ok(RebaseOutcome::Conflict)
    } else {
      Ok(RebaseOutcome::OtherFailure(stderr.trim().to_string()))
    }
  }

  fn abort_rebase(&self) -> ReleaseResult<()> {
    let output = self.run(&["rebase", "--abort"])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(
        GitError::CommandFailed {
          command: "git rebase --abort".to_string(),
          stderr,
        }
        .into(),
      );
    }

    Ok(())
  }

  fn push(&self, remote: &str, branch: Branch) -> ReleaseResult<()> {
    let output = self.run(&["push", remote, branch.as_str()])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(
        GitError::PushFailed {
          remote: remote.to_string(),
          refspec: format!("'{}'", branch),
          stderr,
        }
        .into(),
      );
    }

    Ok(())
  }

  fn push_tags(&self, remote: &str) -> ReleaseResult<()> {
    let output = self.run(&["push", remote, "--tags"])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(
        GitError::PushFailed {
          remote: remote.to_string(),
          refspec: "tags".to_string(),
          stderr,
        }
        .into(),
      );
    }

    Ok(())
  }

  fn commit_all(&self, message: &str) -> ReleaseResult<()> {
    let output = self.run(&["commit", "-am", message])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(
        GitError::CommandFailed {
          command: format!("git commit -am '{}'", message),
          stderr,
        }
        .into(),
      );
    }

    Ok(())
  }

  fn tag(&self, name: &str, message: &str) -> ReleaseResult<()> {
    let output = self.run(&["tag", "-a", name, "-m", message])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      return Err(
        GitError::CommandFailed {
          command: format!("git tag -a {}", name),
          stderr,
        }
        .into(),
      );
    }

    Ok(())
  }
}

/// Parse `git status --porcelain=v2 --branch` output.
///
/// Header lines start with `#`:
///   `# branch.head develop`
///   `# branch.upstream origin/develop`
///   `# branch.ab +1 -2`
/// Every non-header line is one changed, renamed, unmerged or untracked file.
fn parse_porcelain_status(output: &str) -> RepositoryStatus {
  let mut status = RepositoryStatus {
    branch: String::new(),
    tracking: None,
    ahead: 0,
    behind: 0,
    files: 0,
  };

  for line in output.lines() {
    if let Some(rest) = line.strip_prefix("# ") {
      if let Some(head) = rest.strip_prefix("branch.head ") {
        status.branch = head.trim().to_string();
      } else if let Some(upstream) = rest.strip_prefix("branch.upstream ") {
        status.tracking = Some(upstream.trim().to_string());
      } else if let Some(ab) = rest.strip_prefix("branch.ab ") {
        for part in ab.split_whitespace() {
          if let Some(n) = part.strip_prefix('+') {
            status.ahead = n.parse().unwrap_or(0);
          } else if let Some(n) = part.strip_prefix('-') {
            status.behind = n.parse().unwrap_or(0);
          }
        }
      }
    } else if !line.trim().is_empty() {
      status.files += 1;
    }
  }

  status
}

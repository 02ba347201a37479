//! Test helpers: a bare origin plus a working copy with develop/master

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A working copy tracking a local bare origin, with `develop` and `master`
/// pushed and `develop` checked out. The fixture manifest starts at 0.1.0.
pub struct TestRepo {
  _root: TempDir,
  pub work: PathBuf,
}

impl TestRepo {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let remote = root.path().join("origin.git");
    let work = root.path().join("work");

    std::fs::create_dir(&remote)?;
    git(&remote, &["init", "--bare"])?;

    std::fs::create_dir(&work)?;
    git(&work, &["init", "--initial-branch=master"])?;
    git(&work, &["config", "user.name", "Test User"])?;
    git(&work, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      work.join("Cargo.toml"),
      "[package]\nname = \"fixture\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
    )?;
    git(&work, &["add", "."])?;
    git(&work, &["commit", "-m", "Initial commit"])?;
    git(&work, &["branch", "develop"])?;
    git(&work, &["remote", "add", "origin", remote.to_str().unwrap()])?;
    git(&work, &["push", "-u", "origin", "master", "develop"])?;
    git(&work, &["checkout", "develop"])?;

    Ok(Self { _root: root, work })
  }

  /// Run git in the working copy, asserting success
  pub fn git(&self, args: &[&str]) -> Result<Output> {
    git(&self.work, args)
  }

  /// Write a file, stage everything and commit it on the current branch
  pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Result<()> {
    std::fs::write(self.work.join(name), content)?;
    self.git(&["add", "."])?;
    self.git(&["commit", "-m", message])?;
    Ok(())
  }

  /// Resolve a local reference to its SHA
  pub fn rev_parse(&self, reference: &str) -> Result<String> {
    let output = self.git(&["rev-parse", reference])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// SHA a reference points at on the origin, if it exists there
  pub fn remote_sha(&self, refname: &str) -> Result<Option<String>> {
    let output = self.git(&["ls-remote", "origin"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    for line in stdout.lines() {
      if let Some((sha, name)) = line.split_once('\t') {
        if name == refname {
          return Ok(Some(sha.to_string()));
        }
      }
    }
    Ok(None)
  }

  /// Version string currently in the fixture manifest
  pub fn manifest_version(&self) -> Result<String> {
    let content = std::fs::read_to_string(self.work.join("Cargo.toml"))?;
    let line = content
      .lines()
      .find(|l| l.trim_start().starts_with("version = "))
      .context("no version line in fixture manifest")?;
    Ok(line.split('"').nth(1).context("unquoted version")?.to_string())
  }

  /// `git status --porcelain` output for the working copy
  pub fn porcelain_status(&self) -> Result<String> {
    let output = self.git(&["status", "--porcelain"])?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Locally known tags
  pub fn tags(&self) -> Result<String> {
    let output = self.git(&["tag", "-l"])?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the release-train binary; callers assert on the exit status themselves
pub fn run_release_train(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-train");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run release-train")
}

/// CLI overrides replacing the external scripts with no-ops
pub fn no_op_scripts() -> [&'static str; 8] {
  [
    "--install-cmd",
    "true",
    "--lint-cmd",
    "true",
    "--test-cmd",
    "true",
    "--deploy-cmd",
    "true",
  ]
}

/// Assert the binary run succeeded, dumping its output when it did not
pub fn assert_success(output: &Output) {
  assert!(
    output.status.success(),
    "release-train failed\nstdout: {}\nstderr: {}",
    String::from_utf8_lossy(&output.stdout),
    String::from_utf8_lossy(&output.stderr)
  );
}

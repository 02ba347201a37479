//! CLI argument handling and fail-fast guards

use crate::helpers::{TestRepo, no_op_scripts, run_release_train};
use anyhow::Result;

#[test]
fn test_unrecognized_argument_exits_before_git() -> Result<()> {
  // Not even a git repository: classification must fail first
  let dir = tempfile::tempdir()?;
  let output = run_release_train(dir.path(), &["--nightly"])?;

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Unrecognized release argument"), "stderr: {}", stderr);
  assert!(stderr.contains("--minor"), "help should list accepted tokens: {}", stderr);

  Ok(())
}

#[test]
fn test_dirty_tree_fails_without_touching_anything() -> Result<()> {
  let repo = TestRepo::new()?;
  let develop_before = repo.remote_sha("refs/heads/develop")?.unwrap();

  std::fs::write(repo.work.join("scratch.txt"), "uncommitted\n")?;

  let mut args = vec!["--minor"];
  args.extend(no_op_scripts());
  let output = run_release_train(&repo.work, &args)?;

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uncommitted"), "stderr: {}", stderr);

  assert_eq!(repo.remote_sha("refs/heads/develop")?.unwrap(), develop_before);
  assert_eq!(repo.tags()?.trim(), "");
  assert_eq!(repo.manifest_version()?, "0.1.0");

  Ok(())
}

#[test]
fn test_ahead_of_remote_is_rejected() -> Result<()> {
  let repo = TestRepo::new()?;

  // Local develop commit that was never pushed
  repo.commit_file("local.txt", "local work\n", "Unpushed local work")?;

  let mut args = vec!["--preminor"];
  args.extend(no_op_scripts());
  let output = run_release_train(&repo.work, &args)?;

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("ahead"), "stderr: {}", stderr);

  // Nothing was pulled, pushed or tagged
  assert_eq!(repo.tags()?.trim(), "");

  Ok(())
}

#[test]
fn test_failing_script_blocks_the_version_bump() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_release_train(
    &repo.work,
    &[
      "--minor",
      "--install-cmd",
      "true",
      "--lint-cmd",
      "true",
      "--test-cmd",
      "false",
      "--deploy-cmd",
      "true",
    ],
  )?;

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("failed with exit code"), "stderr: {}", stderr);

  // Versioning never ran
  assert_eq!(repo.manifest_version()?, "0.1.0");
  assert_eq!(repo.tags()?.trim(), "");
  assert!(repo.remote_sha("refs/tags/v0.2.0")?.is_none());

  Ok(())
}

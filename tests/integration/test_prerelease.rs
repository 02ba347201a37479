//! End-to-end prerelease flow: develop and tags only, master untouched

use crate::helpers::{TestRepo, assert_success, no_op_scripts, run_release_train};
use anyhow::Result;

#[test]
fn test_preminor_releases_develop_only() -> Result<()> {
  let repo = TestRepo::new()?;
  let master_before = repo.remote_sha("refs/heads/master")?.unwrap();

  let mut args = vec!["--preminor"];
  args.extend(no_op_scripts());
  let output = run_release_train(&repo.work, &args)?;
  assert_success(&output);

  // Minor-level prerelease bump introducing the identifier
  assert_eq!(repo.manifest_version()?, "0.2.0-rc.0");

  // The version commit went out on develop, with its tag
  let develop_local = repo.rev_parse("develop")?;
  assert_eq!(repo.remote_sha("refs/heads/develop")?.as_deref(), Some(develop_local.as_str()));
  assert!(repo.remote_sha("refs/tags/v0.2.0-rc.0")?.is_some());

  // master was never touched
  assert_eq!(repo.remote_sha("refs/heads/master")?.unwrap(), master_before);
  assert_eq!(repo.rev_parse("master")?, master_before);

  Ok(())
}

#[test]
fn test_second_prerelease_increments_counter() -> Result<()> {
  let repo = TestRepo::new()?;

  let mut args = vec!["--preminor"];
  args.extend(no_op_scripts());
  assert_success(&run_release_train(&repo.work, &args)?);

  let mut args = vec!["--prerelease"];
  args.extend(no_op_scripts());
  assert_success(&run_release_train(&repo.work, &args)?);

  assert_eq!(repo.manifest_version()?, "0.2.0-rc.1");
  assert!(repo.remote_sha("refs/tags/v0.2.0-rc.1")?.is_some());

  Ok(())
}

#[test]
fn test_json_session_report() -> Result<()> {
  let repo = TestRepo::new()?;

  let mut args = vec!["--preminor", "--json"];
  args.extend(no_op_scripts());
  let output = run_release_train(&repo.work, &args)?;
  assert_success(&output);

  // The JSON document is the last thing printed, after the progress lines
  let stdout = String::from_utf8_lossy(&output.stdout).to_string();
  let json_start = stdout.find('{').expect("no JSON in stdout");
  let session: serde_json::Value = serde_json::from_str(&stdout[json_start..])?;

  assert_eq!(session["kind"], "prerelease");
  assert_eq!(session["phase"], "done");
  assert!(session["steps"].as_array().is_some_and(|s| !s.is_empty()));

  Ok(())
}

//! End-to-end release state machine
//!
//! Drives the linear sequence synchronize → build → version → deploy →
//! publish. Every step runs to completion before the next starts, every
//! failure is terminal, and nothing mutated by a failed step is auto-reverted:
//! re-running from a clean, correctly-branched state is the recovery path.

use crate::core::error::ReleaseResult;
use crate::core::scripts::ScriptRunner;
use crate::core::session::{ReleasePhase, ReleaseSession};
use crate::core::sync::Synchronizer;
use crate::core::vcs::Vcs;
use crate::release::{ReleaseKind, version};
use std::path::PathBuf;

/// The named external commands the flow runs, in their fixed order
pub struct ReleaseScripts {
  pub install: String,
  pub lint: String,
  pub test: String,
  pub deploy: String,
}

/// Drives one release invocation and owns its session record
pub struct Orchestrator<'a, V: Vcs, R: ScriptRunner> {
  vcs: &'a V,
  runner: &'a R,
  remote: String,
  manifest: PathBuf,
  scripts: ReleaseScripts,
  session: ReleaseSession,
}

impl<'a, V: Vcs, R: ScriptRunner> Orchestrator<'a, V, R> {
  pub fn new(
    vcs: &'a V,
    runner: &'a R,
    kind: ReleaseKind,
    remote: impl Into<String>,
    manifest: impl Into<PathBuf>,
    scripts: ReleaseScripts,
  ) -> Self {
    Self {
      vcs,
      runner,
      remote: remote.into(),
      manifest: manifest.into(),
      scripts,
      session: ReleaseSession::new(kind),
    }
  }

  /// The step log for this invocation
  pub fn session(&self) -> &ReleaseSession {
    &self.session
  }

  /// Run the whole release process
  pub fn make_release(&mut self) -> ReleaseResult<()> {
    let kind = self.session.kind;
    let vcs = self.vcs;
    let sync = Synchronizer::new(vcs, self.remote.clone());

    self.session.enter(ReleasePhase::Synchronizing);
    self.observe(sync.prepare_local_repository(kind), "synchronized local branches")?;

    self.session.enter(ReleasePhase::Building);
    let install = self.scripts.install.clone();
    let lint = self.scripts.lint.clone();
    let test = self.scripts.test.clone();
    for script in [install, lint, test] {
      let result = self.runner.run(&script);
      self.observe(result, format!("ran `{}`", script))?;
    }

    self.session.enter(ReleasePhase::Versioning);
    let manifest = self.manifest.clone();
    let next = self.observe(version::bump(vcs, &manifest, kind), "bumped version")?;

    self.session.enter(ReleasePhase::Deploying);
    let deploy = self.scripts.deploy.clone();
    let result = self.runner.run(&deploy);
    self.observe(result, format!("ran `{}`", deploy))?;

    self.session.enter(ReleasePhase::Publishing);
    self.observe(sync.finish_release(kind), "pushed release to remote")?;

    self.session.finish();
    println!("\n✅ Release v{} completed", next);
    Ok(())
  }

  /// Record a step outcome in the session, leaving the error untouched
  fn observe<T>(&mut self, result: ReleaseResult<T>, detail: impl Into<String>) -> ReleaseResult<T> {
    let detail = detail.into();
    match result {
      Ok(value) => {
        self.session.step(detail);
        Ok(value)
      }
      Err(err) => {
        self.session.fail(format!("{}: {}", detail, err));
        Err(err)
      }
    }
  }
}

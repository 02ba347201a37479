//! In-process record of one release invocation
//!
//! The session is owned by the orchestrator, appended to as each phase runs,
//! and discarded at process exit. With `--json` the CLI serializes it to
//! stdout so automation can inspect which steps ran and where a run stopped.

use crate::release::ReleaseKind;
use serde::Serialize;
use std::fmt;

/// States of the release state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleasePhase {
  Idle,
  Synchronizing,
  Building,
  Versioning,
  Deploying,
  Publishing,
  Done,
  Failed,
}

impl fmt::Display for ReleasePhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ReleasePhase::Idle => "idle",
      ReleasePhase::Synchronizing => "synchronizing",
      ReleasePhase::Building => "building",
      ReleasePhase::Versioning => "versioning",
      ReleasePhase::Deploying => "deploying",
      ReleasePhase::Publishing => "publishing",
      ReleasePhase::Done => "done",
      ReleasePhase::Failed => "failed",
    };
    f.write_str(name)
  }
}

/// One completed or failed step within a phase
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
  pub phase: ReleasePhase,
  pub detail: String,
  pub ok: bool,
}

/// Transient state for one invocation: the chosen kind plus the step log
#[derive(Debug, Serialize)]
pub struct ReleaseSession {
  pub kind: ReleaseKind,
  pub phase: ReleasePhase,
  pub steps: Vec<StepRecord>,
}

impl ReleaseSession {
  pub fn new(kind: ReleaseKind) -> Self {
    Self {
      kind,
      phase: ReleasePhase::Idle,
      steps: Vec::new(),
    }
  }

  /// Move the machine into `phase`
  pub fn enter(&mut self, phase: ReleasePhase) {
    self.phase = phase;
  }

  /// Record a completed step in the current phase
  pub fn step(&mut self, detail: impl Into<String>) {
    self.steps.push(StepRecord {
      phase: self.phase,
      detail: detail.into(),
      ok: true,
    });
  }

  /// Record a failed step and move to the terminal `Failed` state
  pub fn fail(&mut self, detail: impl Into<String>) {
    self.steps.push(StepRecord {
      phase: self.phase,
      detail: detail.into(),
      ok: false,
    });
    self.phase = ReleasePhase::Failed;
  }

  /// Move to the terminal `Done` state
  pub fn finish(&mut self) {
    self.phase = ReleasePhase::Done;
  }
}

//! Release classification and orchestration
//!
//! # Core Invariants
//!
//! 1. **The release kind is decided once**
//!    - Classified from the single CLI token before any git interaction
//!    - Never recomputed mid-process
//!
//! 2. **`master` participates only in full releases**
//!    - Prereleases live entirely on `develop`
//!
//! 3. **Every failure is fatal**
//!    - No retries anywhere in the state machine; the operator re-runs from a
//!      clean, correctly-branched state

pub mod orchestrator;
pub mod version;

pub use orchestrator::{Orchestrator, ReleaseScripts};

use crate::core::error::{ReleaseError, ReleaseResult};
use serde::Serialize;

/// Tokens selecting a prerelease
pub const PRERELEASE_TOKENS: &[&str] = &["--prepatch", "--preminor", "--premajor", "--prerelease"];

/// Tokens selecting a full release
pub const RELEASE_TOKENS: &[&str] = &["--patch", "--minor", "--major"];

/// The two kinds of release the flow distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
  Prerelease,
  Release,
}

/// Map the raw CLI argument to a release kind.
///
/// Case-sensitive exact match against the fixed token sets; anything else is
/// rejected before the process touches git.
pub fn classify(raw_arg: &str) -> ReleaseResult<ReleaseKind> {
  if PRERELEASE_TOKENS.contains(&raw_arg) {
    Ok(ReleaseKind::Prerelease)
  } else if RELEASE_TOKENS.contains(&raw_arg) {
    Ok(ReleaseKind::Release)
  } else {
    Err(ReleaseError::UnrecognizedArgument {
      arg: raw_arg.to_string(),
    })
  }
}

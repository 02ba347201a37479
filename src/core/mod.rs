//! Core engine for release-train operations
//!
//! This module contains the building blocks the release flow is assembled from:
//!
//! - **error**: Typed error taxonomy with contextual help messages
//! - **scripts**: External command execution (install, lint, test, deploy)
//! - **session**: In-process record of one release invocation
//! - **sync**: Branch synchronization against the remote (pre/post release)
//! - **vcs**: Git operations abstraction (SystemGit)

pub mod error;
pub mod scripts;
pub mod session;
pub mod sync;
pub mod vcs;

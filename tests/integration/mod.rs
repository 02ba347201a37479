//! Integration test suite for release-train
//!
//! Each test drives the compiled binary against a throwaway working copy
//! cloned from a bare origin, with `true`/`false` stand-ins for the external
//! scripts.

mod helpers;

mod test_cli;
mod test_prerelease;

//! Version bumping: read the manifest, compute the next version, commit, tag
//!
//! The manifest is edited losslessly with `toml_edit` so unrelated formatting
//! survives the bump. The rules mirror the classic two-branch flow:
//!
//! - full release: minor bump (a version already sitting on a prerelease of
//!   the next minor finalizes to that minor instead)
//! - prerelease with an existing identifier: increment its trailing counter
//! - prerelease without one: minor bump introducing the `rc.0` identifier

use crate::core::error::{ReleaseResult, VersionError};
use crate::core::vcs::Vcs;
use crate::release::ReleaseKind;
use semver::{Prerelease, Version};
use std::path::Path;

/// Read `[package] version` from a manifest
pub fn read_version(manifest: &Path) -> ReleaseResult<Version> {
  let content = std::fs::read_to_string(manifest).map_err(|e| VersionError::ManifestRead {
    path: manifest.display().to_string(),
    reason: e.to_string(),
  })?;

  let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
    VersionError::ManifestParse {
      path: manifest.display().to_string(),
      reason: e.to_string(),
    }
  })?;

  let raw = doc
    .get("package")
    .and_then(|p| p.get("version"))
    .and_then(|v| v.as_str())
    .ok_or_else(|| VersionError::MissingVersion {
      path: manifest.display().to_string(),
    })?;

  Version::parse(raw)
    .map_err(|e| {
      VersionError::InvalidVersion {
        raw: raw.to_string(),
        reason: e.to_string(),
      }
      .into()
    })
}

/// Write `[package] version` back, preserving the rest of the file
pub fn write_version(manifest: &Path, version: &Version) -> ReleaseResult<()> {
  let content = std::fs::read_to_string(manifest).map_err(|e| VersionError::ManifestRead {
    path: manifest.display().to_string(),
    reason: e.to_string(),
  })?;

  let mut doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
    VersionError::ManifestParse {
      path: manifest.display().to_string(),
      reason: e.to_string(),
    }
  })?;

  match doc.get_mut("package").and_then(|p| p.as_table_mut()) {
    Some(package) => package["version"] = toml_edit::value(version.to_string()),
    None => {
      return Err(
        VersionError::MissingVersion {
          path: manifest.display().to_string(),
        }
        .into(),
      );
    }
  }

  std::fs::write(manifest, doc.to_string()).map_err(|e| {
    VersionError::ManifestRead {
      path: manifest.display().to_string(),
      reason: e.to_string(),
    }
    .into()
  })
}

/// Compute the next version from the kind-dependent rule
pub fn next_version(current: &Version, kind: ReleaseKind) -> ReleaseResult<Version> {
  match kind {
    ReleaseKind::Release => {
      // A pre-minor version (x.y.0-pre) finalizes to its own minor
      if !current.pre.is_empty() && current.patch == 0 {
        Ok(Version::new(current.major, current.minor, 0))
      } else {
        Ok(Version::new(current.major, current.minor + 1, 0))
      }
    }
    ReleaseKind::Prerelease => {
      if current.pre.is_empty() {
        let mut next = Version::new(current.major, current.minor + 1, 0);
        next.pre = prerelease("rc.0")?;
        Ok(next)
      } else {
        let mut next = Version::new(current.major, current.minor, current.patch);
        next.pre = bump_identifier(&current.pre)?;
        Ok(next)
      }
    }
  }
}

/// Increment the trailing numeric component of a prerelease identifier.
///
/// `rc.1` becomes `rc.2`; an identifier without a trailing counter gains one
/// (`rc` becomes `rc.0`).
fn bump_identifier(pre: &Prerelease) -> ReleaseResult<Prerelease> {
  let mut segments: Vec<String> = pre.as_str().split('.').map(str::to_string).collect();

  match segments.last().and_then(|s| s.parse::<u64>().ok()) {
    Some(n) => {
      let last = segments.len() - 1;
      segments[last] = (n + 1).to_string();
    }
    None => segments.push("0".to_string()),
  }

  prerelease(&segments.join("."))
}

fn prerelease(raw: &str) -> ReleaseResult<Prerelease> {
  Prerelease::new(raw).map_err(|e| {
    VersionError::InvalidVersion {
      raw: raw.to_string(),
      reason: e.to_string(),
    }
    .into()
  })
}

/// Bump the manifest version and record it as a commit plus annotated tag.
///
/// Any failure here gates the remaining release steps.
pub fn bump<V: Vcs>(vcs: &V, manifest: &Path, kind: ReleaseKind) -> ReleaseResult<Version> {
  let current = read_version(manifest)?;
  let next = next_version(&current, kind)?;

  println!("📦 Upgrading version {} -> {}", current, next);

  write_version(manifest, &next)?;
  vcs.commit_all(&format!("v{}", next))?;
  vcs.tag(&format!("v{}", next), &format!("Release v{}", next))?;

  Ok(next)
}

//! Resolution of the four directory roots shared with containerized builds.
//!
//! Each directory can be overridden through an environment variable and
//! defaults to a subdirectory of the invocation location:
//!
//! | variable       | default      | purpose                               |
//! |----------------|--------------|---------------------------------------|
//! | `WORK_DIR`     | `./work`     | scratch build state                   |
//! | `DIST_DIR`     | `./dist`     | output artifacts                      |
//! | `PLATFORM_DIR` | `./platform` | per-target build scripts (read-only)  |
//! | `VENDOR_DIR`   | `./vendor`   | downloaded artifacts + source archive |

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PlatformError;

/// The directory set exchanged between the driver and the container steps.
///
/// All paths are absolute so they can be passed directly to `docker run -v`
/// regardless of where the build was invoked from.
#[derive(Debug, Clone)]
pub struct BuildDirs {
  pub work: PathBuf,
  pub dist: PathBuf,
  pub platform: PathBuf,
  pub vendor: PathBuf,
}

impl BuildDirs {
  /// Resolve the directory set from the environment.
  pub fn from_env() -> Result<Self, PlatformError> {
    let cwd = env::current_dir().map_err(PlatformError::CurrentDir)?;

    let dirs = Self {
      work: resolve(&cwd, "WORK_DIR", "work"),
      dist: resolve(&cwd, "DIST_DIR", "dist"),
      platform: resolve(&cwd, "PLATFORM_DIR", "platform"),
      vendor: resolve(&cwd, "VENDOR_DIR", "vendor"),
    };

    debug!(
      work = %dirs.work.display(),
      dist = %dirs.dist.display(),
      platform = %dirs.platform.display(),
      vendor = %dirs.vendor.display(),
      "resolved build directories"
    );

    Ok(dirs)
  }

  /// Create the directories the build writes to.
  ///
  /// Only `work` and `dist` are created; `platform` and `vendor` are inputs
  /// expected to exist already. Pre-existing directories are not an error.
  pub fn ensure(&self) -> Result<(), PlatformError> {
    for path in [&self.work, &self.dist] {
      fs::create_dir_all(path).map_err(|e| PlatformError::CreateDir {
        path: path.clone(),
        source: e,
      })?;
    }

    info!(work = %self.work.display(), dist = %self.dist.display(), "build directories ready");
    Ok(())
  }
}

/// Read an override variable, falling back to `default` under `cwd`.
fn resolve(cwd: &Path, var: &str, default: &str) -> PathBuf {
  let raw = env::var(var).map_or_else(|_| PathBuf::from(default), PathBuf::from);
  if raw.is_absolute() { raw } else { cwd.join(raw) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  #[serial]
  fn defaults_are_under_cwd() {
    temp_env::with_vars_unset(["WORK_DIR", "DIST_DIR", "PLATFORM_DIR", "VENDOR_DIR"], || {
      let cwd = env::current_dir().unwrap();
      let dirs = BuildDirs::from_env().unwrap();

      assert_eq!(dirs.work, cwd.join("work"));
      assert_eq!(dirs.dist, cwd.join("dist"));
      assert_eq!(dirs.platform, cwd.join("platform"));
      assert_eq!(dirs.vendor, cwd.join("vendor"));
    });
  }

  #[test]
  #[serial]
  fn env_override_absolute() {
    let temp = TempDir::new().unwrap();
    let vendor = temp.path().join("third-party");

    temp_env::with_var("VENDOR_DIR", Some(vendor.to_str().unwrap()), || {
      let dirs = BuildDirs::from_env().unwrap();
      assert_eq!(dirs.vendor, vendor);
    });
  }

  #[test]
  #[serial]
  fn env_override_relative_resolves_against_cwd() {
    temp_env::with_var("WORK_DIR", Some("scratch"), || {
      let cwd = env::current_dir().unwrap();
      let dirs = BuildDirs::from_env().unwrap();
      assert_eq!(dirs.work, cwd.join("scratch"));
    });
  }

  #[test]
  fn ensure_creates_work_and_dist_only() {
    let temp = TempDir::new().unwrap();
    let dirs = BuildDirs {
      work: temp.path().join("work"),
      dist: temp.path().join("dist"),
      platform: temp.path().join("platform"),
      vendor: temp.path().join("vendor"),
    };

    dirs.ensure().unwrap();

    assert!(dirs.work.is_dir());
    assert!(dirs.dist.is_dir());
    assert!(!dirs.platform.exists());
    assert!(!dirs.vendor.exists());
  }

  #[test]
  fn ensure_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dirs = BuildDirs {
      work: temp.path().join("work"),
      dist: temp.path().join("dist"),
      platform: temp.path().join("platform"),
      vendor: temp.path().join("vendor"),
    };

    dirs.ensure().unwrap();
    dirs.ensure().unwrap();
  }
}

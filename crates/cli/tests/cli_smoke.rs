//! CLI smoke tests for kevbuild.
//!
//! These tests exercise argument validation and the early pipeline steps up
//! to the first external-tool boundary. Real fetches and docker runs are out
//! of scope; the tests clear PATH so the first tool probe decides the
//! outcome.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the kevbuild binary, with directory overrides cleared
/// so the host environment cannot leak into the tests.
fn kevbuild() -> Command {
  let mut cmd = cargo_bin_cmd!("kevbuild");
  for var in ["WORK_DIR", "DIST_DIR", "PLATFORM_DIR", "VENDOR_DIR"] {
    cmd.env_remove(var);
  }
  cmd
}

// =============================================================================
// Help & argument validation
// =============================================================================

#[test]
fn help_flag_works() {
  kevbuild()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn all_with_other_target_exits_1_with_usage() {
  let temp = TempDir::new().unwrap();

  kevbuild()
    .current_dir(temp.path())
    .args(["all", "dos"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("not allowed with other targets"))
    .stderr(predicate::str::contains("Usage"));

  // Rejected before any side effect: nothing was created in the invocation
  // directory.
  assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn all_after_other_target_is_also_rejected() {
  kevbuild().args(["dos", "all"]).assert().code(1);
}

#[test]
fn unknown_target_is_rejected() {
  kevbuild()
    .arg("amiga")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value"));
}

// =============================================================================
// Pipeline boundaries
// =============================================================================

#[test]
fn missing_download_tool_exits_2() {
  let temp = TempDir::new().unwrap();

  // With an empty PATH the SDL fetch cannot find wget; the whole program
  // must stop with the distinguished missing-tool exit code before any
  // network access is attempted.
  kevbuild()
    .current_dir(temp.path())
    .env("PATH", "")
    .args(["-v", "1.0", "appimage"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("wget is required to fetch SDL"));

  // Directory setup had already happened by then.
  assert!(temp.path().join("work").is_dir());
  assert!(temp.path().join("dist").is_dir());
}

#[test]
fn cached_sdl_source_skips_the_fetch() {
  let temp = TempDir::new().unwrap();
  let vendor = temp.path().join("vendor");
  std::fs::create_dir(&vendor).unwrap();
  std::fs::write(vendor.join("SDL2-2.0.5.tar.gz"), b"cached").unwrap();

  // PATH is empty, so reaching for wget would exit 2. Instead the fetch is
  // skipped and the pipeline proceeds to the source archive step, which
  // fails to spawn git: a propagated failure, exit 1.
  kevbuild()
    .current_dir(temp.path())
    .env("PATH", "")
    .env("VENDOR_DIR", &vendor)
    .args(["-v", "1.0", "dos"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to run 'git"));
}

#[test]
fn default_version_requires_git() {
  let temp = TempDir::new().unwrap();

  kevbuild()
    .current_dir(temp.path())
    .env("PATH", "")
    .arg("dos")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to resolve version from git"));
}

/// Resolve the host's git binary, or `None` when it is not installed.
fn real_git() -> Option<PathBuf> {
  let out = std::process::Command::new("sh").args(["-c", "command -v git"]).output().ok()?;
  if !out.status.success() {
    return None;
  }
  Some(PathBuf::from(String::from_utf8(out.stdout).ok()?.trim()))
}

/// Create a scratch repository with a single commit.
fn scratch_repo() -> TempDir {
  let temp = TempDir::new().unwrap();
  let git = |args: &[&str]| {
    let status = std::process::Command::new("git")
      .args(args)
      .current_dir(temp.path())
      .env("GIT_AUTHOR_NAME", "test")
      .env("GIT_AUTHOR_EMAIL", "test@example.com")
      .env("GIT_COMMITTER_NAME", "test")
      .env("GIT_COMMITTER_EMAIL", "test@example.com")
      .status()
      .unwrap();
    assert!(status.success(), "git {args:?} failed");
  };

  git(&["init", "-q"]);
  std::fs::write(temp.path().join("README"), "kevedit\n").unwrap();
  git(&["add", "README"]);
  git(&["commit", "-q", "-m", "initial"]);
  temp
}

#[test]
fn default_version_is_the_current_git_revision() {
  let Some(git) = real_git() else { return };
  let repo = scratch_repo();

  let head = std::process::Command::new("git")
    .args(["rev-parse", "--verify", "HEAD"])
    .current_dir(repo.path())
    .output()
    .unwrap();
  let head = String::from_utf8(head.stdout).unwrap().trim().to_string();

  // PATH holds only git: version resolution succeeds against the scratch
  // repo, then the SDL fetch stops at the wget probe with exit code 2.
  let bin = TempDir::new().unwrap();
  std::os::unix::fs::symlink(&git, bin.path().join("git")).unwrap();

  kevbuild()
    .current_dir(repo.path())
    .env("PATH", bin.path())
    .arg("dos")
    .assert()
    .code(2)
    .stdout(predicate::str::contains("using current git revision"))
    .stdout(predicate::str::contains(head.as_str()))
    .stderr(predicate::str::contains("wget is required to fetch SDL"));
}

//! Source archive creation from version control.
//!
//! Unlike vendor artifacts, the source archive is re-created on every
//! invocation: a version reference (a branch, or HEAD) does not pin content
//! reproducibly, so an existing file proves nothing.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::process;

/// `kevedit-<version>.zip` — a pure function of the version string.
pub fn source_filename(version: &str) -> String {
  format!("kevedit-{version}.zip")
}

/// The current commit hash, used when no version was given on the command
/// line.
pub fn head_revision() -> Result<String> {
  process::check_output("git", ["rev-parse", "--verify", "HEAD"])
}

/// Snapshot the repository at `version` into a zip archive in the vendor
/// directory, returning the archive path.
///
/// The archive covers the committed state at that reference, never the
/// working tree. `git archive` runs with its working directory set to the
/// repository top level so the whole tree is captured even when the build was
/// invoked from a subdirectory; the invoking process's own directory is never
/// changed. Re-running with the same version overwrites the archive.
pub fn make_source_archive(version: &str, vendor: &Path) -> Result<PathBuf> {
  let output = vendor.join(source_filename(version));

  let toplevel = process::check_output("git", ["rev-parse", "--show-toplevel"])?;
  debug!(toplevel, "archiving from the repository top level");

  archive_tree(Path::new(&toplevel), version, &output)?;

  info!(version, archive = %output.display(), "made source archive");
  Ok(output)
}

/// Export the tree of `repo` at `version` to a zip file at `output`.
pub fn archive_tree(repo: &Path, version: &str, output: &Path) -> Result<()> {
  process::run_in(
    "git",
    [
      OsStr::new("archive"),
      OsStr::new(version),
      OsStr::new("--format"),
      OsStr::new("zip"),
      OsStr::new("--output"),
      output.as_os_str(),
    ],
    repo,
  )
}

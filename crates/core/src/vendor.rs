//! Fetch-if-missing caching of third-party vendor artifacts.
//!
//! Every artifact is keyed by name and version; its presence in the vendor
//! directory is sufficient proof of validity, so nothing is re-checked once
//! cached. Downloads go through `wget` and the SDL source tarball is verified
//! against its detached signature with `gpg` before being accepted.
//!
//! The check-then-fetch sequence is not atomic against concurrent
//! invocations. The build is a single local/CI run, not a shared service.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::process;

/// SDL2 version built against on every platform.
pub const SDL_VERSION: &str = "2.0.5";

/// InnoSetup packer version used for the Windows installer.
pub const ISPACK_VERSION: &str = "5.5.3";

/// AppImageKit release used for Linux packaging.
pub const APPIMAGE_VERSION: &str = "9";

const SDL_RELEASE_URL: &str = "https://www.libsdl.org/release";
const ISPACK_URL: &str = "http://files.jrsoftware.org/ispack";
const APPIMAGE_RELEASE_URL: &str = "https://github.com/AppImage/AppImageKit/releases/download";

/// `SDL2-<version>.tar.gz`
pub fn sdl_source_filename(version: &str) -> String {
  format!("SDL2-{version}.tar.gz")
}

/// `SDL2-<version>-win32-x64.zip`
pub fn sdl_windows_runtime_filename(version: &str) -> String {
  format!("SDL2-{version}-win32-x64.zip")
}

/// `ispack-<version>-unicode.exe`
pub fn ispack_filename(version: &str) -> String {
  format!("ispack-{version}-unicode.exe")
}

/// `appimagetool-<version>-x86_64.AppImage`
pub fn appimagetool_filename(version: &str) -> String {
  format!("appimagetool-{version}-x86_64.AppImage")
}

/// `AppRun-<version>-x86_64`
pub fn apprun_filename(version: &str) -> String {
  format!("AppRun-{version}-x86_64")
}

/// Fetch the SDL source tarball and verify its detached signature.
///
/// A tarball that fails verification is deleted along with its signature so a
/// later run cannot mistake it for a valid cache entry.
pub fn fetch_sdl_source(vendor: &Path, version: &str) -> Result<()> {
  let filename = sdl_source_filename(version);
  let tarball = vendor.join(&filename);
  let signature = vendor.join(format!("{filename}.sig"));

  if tarball.exists() {
    debug!(path = %tarball.display(), "SDL source already cached; will not fetch");
    return Ok(());
  }

  // Make sure we can both fetch and check the signature before downloading.
  process::validate_runs("wget", ["--version"], "wget is required to fetch SDL")?;
  process::validate_runs("gpg", ["--version"], "gpg is required to fetch SDL")?;

  debug!("fetching SDL source");
  download(&format!("{SDL_RELEASE_URL}/{filename}"), &tarball)?;
  debug!("fetching SDL signature");
  download(&format!("{SDL_RELEASE_URL}/{filename}.sig"), &signature)?;

  debug!("checking SDL signature");
  if let Err(err) = process::run("gpg", [
    OsStr::new("--verify"),
    signature.as_os_str(),
    tarball.as_os_str(),
  ]) {
    let _ = fs::remove_file(&tarball);
    let _ = fs::remove_file(&signature);
    return Err(Error::SignatureRejected {
      artifact: filename,
      source: Box::new(err),
    });
  }

  info!(version, "fetched SDL source");
  Ok(())
}

/// Fetch the SDL Windows runtime zip.
pub fn fetch_sdl_windows_runtime(vendor: &Path, version: &str) -> Result<()> {
  let filename = sdl_windows_runtime_filename(version);
  let dest = vendor.join(&filename);

  if dest.exists() {
    debug!(path = %dest.display(), "SDL windows runtime already cached; will not fetch");
    return Ok(());
  }

  process::validate_runs("wget", ["--version"], "wget is required to fetch SDL windows runtime")?;

  debug!("fetching SDL windows runtime");
  download(&format!("{SDL_RELEASE_URL}/{filename}"), &dest)?;

  info!(version, "fetched SDL windows runtime");
  Ok(())
}

/// Fetch the InnoSetup packer executable.
pub fn fetch_ispack(vendor: &Path, version: &str) -> Result<()> {
  let filename = ispack_filename(version);
  let dest = vendor.join(&filename);

  if dest.exists() {
    debug!(path = %dest.display(), "ispack already cached; will not fetch");
    return Ok(());
  }

  process::validate_runs("wget", ["--version"], "wget is required to fetch ispack")?;

  debug!("fetching ispack");
  download(&format!("{ISPACK_URL}/{filename}"), &dest)?;

  info!(version, "fetched ispack");
  Ok(())
}

/// Fetch the AppImage packaging binaries (appimagetool and AppRun).
///
/// The two files are cached independently; each is skipped on its own if
/// already present. Both are made executable after download.
pub fn fetch_appimage_tools(vendor: &Path, version: &str) -> Result<()> {
  let files = [
    ("appimagetool-x86_64.AppImage", appimagetool_filename(version)),
    ("AppRun-x86_64", apprun_filename(version)),
  ];

  for (remote, local) in files {
    let dest = vendor.join(&local);
    if dest.exists() {
      debug!(path = %dest.display(), "AppImage file already cached; will not fetch");
      continue;
    }

    process::validate_runs("wget", ["--version"], "wget is required to fetch AppImage")?;

    debug!(file = remote, "fetching AppImage file");
    download(&format!("{APPIMAGE_RELEASE_URL}/{version}/{remote}"), &dest)?;
    make_executable(&dest)?;

    info!(file = remote, "fetched AppImage file");
  }

  Ok(())
}

fn download(url: &str, dest: &Path) -> Result<()> {
  process::run("wget", [OsStr::new(url), OsStr::new("-O"), dest.as_os_str()])
}

fn make_executable(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
  Ok(())
}

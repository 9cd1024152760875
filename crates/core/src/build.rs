//! Per-target containerized build recipes.
//!
//! Every builder follows the same shape: fetch target-specific vendor
//! artifacts, build a container image from the target's image definition,
//! then run the target's build script in a container with the work, dist,
//! platform and vendor directories mounted and the invoking user's uid:gid so
//! produced files are not root-owned. The appimage target adds a privileged
//! packaging run (appimagetool needs fuse) followed by an ownership fix-up.
//!
//! Builders are strictly linear: no step is retried or skipped, and the first
//! failure aborts the whole invocation, including any remaining selected
//! targets.

use std::path::Path;

use kevbuild_platform::{BuildDirs, uid_gid};
use tracing::info;

use crate::archive::source_filename;
use crate::error::Result;
use crate::process;
use crate::target::Target;
use crate::vendor::{
  APPIMAGE_VERSION, ISPACK_VERSION, SDL_VERSION, appimagetool_filename, fetch_appimage_tools,
  fetch_ispack, fetch_sdl_windows_runtime,
};

/// Immutable configuration shared by every build step.
///
/// Constructed once at startup so that nothing deeper in the call chain
/// reaches into the process environment.
#[derive(Debug, Clone)]
pub struct BuildContext {
  pub dirs: BuildDirs,
  pub uid_gid: String,
  pub version: String,
}

impl BuildContext {
  /// Resolve the context from the environment for the given version.
  pub fn new(version: String) -> Result<Self> {
    Ok(Self {
      dirs: BuildDirs::from_env()?,
      uid_gid: uid_gid(),
      version,
    })
  }
}

/// Build one target. Dispatch is exhaustive: a new target variant will not
/// compile without a builder.
pub fn build_target(target: Target, ctx: &BuildContext) -> Result<()> {
  info!(target = %target, version = %ctx.version, "building target");

  match target {
    Target::Appimage => build_appimage(ctx),
    Target::Dos => build_dos(ctx),
    Target::Macos => build_macos(ctx),
    Target::Windows => build_windows(ctx),
  }
}

/// `KevEdit-<version>-x86_64.AppImage`, the appimage artifact name in dist.
pub fn appimage_artifact(version: &str) -> String {
  format!("KevEdit-{version}-x86_64.AppImage")
}

/// Linux x86_64 AppImage.
fn build_appimage(ctx: &BuildContext) -> Result<()> {
  fetch_appimage_tools(&ctx.dirs.vendor, APPIMAGE_VERSION)?;

  let source = source_filename(&ctx.version);
  process::run(
    "docker",
    docker_build_args(Target::Appimage, &[("SDL_VERSION", SDL_VERSION)]),
  )?;
  process::run(
    "docker",
    docker_run_args(ctx, Target::Appimage, &[source.as_str(), APPIMAGE_VERSION]),
  )?;
  process::run("docker", docker_package_args(ctx))?;

  Ok(())
}

/// DOS 32-bit executable in a zip file.
fn build_dos(ctx: &BuildContext) -> Result<()> {
  // TODO: fetch the build-djgpp toolchain into the vendor cache instead of
  // baking it into the image.

  let source = source_filename(&ctx.version);
  process::run("docker", docker_build_args(Target::Dos, &[]))?;
  process::run(
    "docker",
    docker_run_args(ctx, Target::Dos, &[source.as_str(), &ctx.version]),
  )?;

  Ok(())
}

/// macOS x86_64 .app in a .dmg archive.
fn build_macos(ctx: &BuildContext) -> Result<()> {
  let source = source_filename(&ctx.version);
  process::run(
    "docker",
    docker_build_args(Target::Macos, &[("SDL_VERSION", SDL_VERSION)]),
  )?;
  process::run(
    "docker",
    docker_run_args(ctx, Target::Macos, &[source.as_str(), &ctx.version]),
  )?;

  Ok(())
}

/// Windows x64 executable in a self-executing installer.
fn build_windows(ctx: &BuildContext) -> Result<()> {
  fetch_sdl_windows_runtime(&ctx.dirs.vendor, SDL_VERSION)?;
  fetch_ispack(&ctx.dirs.vendor, ISPACK_VERSION)?;

  let source = source_filename(&ctx.version);
  process::run(
    "docker",
    docker_build_args(Target::Windows, &[
      ("SDL_VERSION", SDL_VERSION),
      ("ISPACK_VERSION", ISPACK_VERSION),
    ]),
  )?;
  process::run(
    "docker",
    docker_run_args(ctx, Target::Windows, &[source.as_str(), &ctx.version, SDL_VERSION]),
  )?;

  Ok(())
}

/// `docker build` argument vector for a target image.
fn docker_build_args(target: Target, build_args: &[(&str, &str)]) -> Vec<String> {
  let mut args = vec![
    "build".to_string(),
    "-f".to_string(),
    target.dockerfile().to_string(),
    "-t".to_string(),
    target.image_tag().to_string(),
  ];
  for (name, value) in build_args {
    args.push("--build-arg".to_string());
    args.push(format!("{name}={value}"));
  }
  args.push(".".to_string());
  args
}

/// `docker run` argument vector invoking a target's build script.
///
/// Mounts all four directories at their fixed container paths and runs as the
/// invoking user.
fn docker_run_args(ctx: &BuildContext, target: Target, script_args: &[&str]) -> Vec<String> {
  let mut args = vec![
    "run".to_string(),
    "-v".to_string(),
    mount(&ctx.dirs.work, "/work"),
    "-v".to_string(),
    mount(&ctx.dirs.dist, "/dist"),
    "-v".to_string(),
    mount(&ctx.dirs.platform, "/platform"),
    "-v".to_string(),
    mount(&ctx.dirs.vendor, "/vendor"),
    "-u".to_string(),
    ctx.uid_gid.clone(),
    target.image_tag().to_string(),
    target.script().to_string(),
  ];
  args.extend(script_args.iter().map(|a| a.to_string()));
  args
}

/// `docker run` argument vector for the privileged appimage packaging step.
///
/// appimagetool needs fuse, hence `--privileged`; that in turn means the
/// container writes as root, so the artifact is chowned back to the invoking
/// user in the same shell command.
fn docker_package_args(ctx: &BuildContext) -> Vec<String> {
  let tool = appimagetool_filename(APPIMAGE_VERSION);
  let artifact = appimage_artifact(&ctx.version);
  let script = format!(
    "/vendor/{tool} /work/appdir/KevEdit.AppDir /dist/{artifact} && chown {uid_gid} /dist/{artifact}",
    uid_gid = ctx.uid_gid,
  );

  vec![
    "run".to_string(),
    "--privileged".to_string(),
    "-v".to_string(),
    mount(&ctx.dirs.work, "/work"),
    "-v".to_string(),
    mount(&ctx.dirs.dist, "/dist"),
    "-v".to_string(),
    mount(&ctx.dirs.vendor, "/vendor"),
    Target::Appimage.image_tag().to_string(),
    "sh".to_string(),
    "-c".to_string(),
    script,
  ]
}

fn mount(host: &Path, guest: &str) -> String {
  format!("{}:{guest}", host.display())
}

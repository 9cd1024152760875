//! kevbuild - build KevEdit for multiple platforms.
//!
//! The driver is a single linear pipeline: resolve configuration, fetch the
//! shared SDL source, snapshot the repository into a source archive, then run
//! each selected target's containerized build. Any failing step aborts the
//! whole invocation, including remaining targets.
//!
//! Exit codes: 0 on success, 1 for usage errors and propagated build
//! failures, 2 when a required external tool is missing.

use std::process::exit;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use owo_colors::OwoColorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kevbuild_core::{BuildContext, Error, SDL_VERSION, Target, archive, build_target, vendor};

/// Build KevEdit for multiple platforms
#[derive(Parser)]
#[command(name = "kevbuild")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
  /// KevEdit version to build (defaults to the current git revision)
  #[arg(short = 'v', long = "version", value_name = "VERSION")]
  version: Option<String>,

  /// Enable debug logging
  #[arg(short, long)]
  debug: bool,

  /// Target platforms to build
  #[arg(value_name = "TARGET", value_enum)]
  targets: Vec<TargetArg>,
}

/// Command-line target names: the four build targets plus the "all"
/// shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetArg {
  All,
  Appimage,
  Dos,
  Macos,
  Windows,
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.debug);

  let Some(targets) = resolve_targets(&cli.targets) else {
    eprintln!("Target \"all\" is not allowed with other targets\n");
    eprintln!("{}", Cli::command().render_usage());
    exit(1);
  };

  if let Err(err) = run(cli.version, &targets) {
    if let Some(Error::MissingTool { message, .. }) = err.downcast_ref::<Error>() {
      eprintln!("{message}");
      exit(2);
    }
    eprintln!("{} {err:#}", "error:".red().bold());
    exit(1);
  }
}

fn run(version: Option<String>, targets: &[Target]) -> Result<()> {
  let version = match version {
    Some(version) => version,
    None => {
      let head = archive::head_revision().context("failed to resolve version from git")?;
      info!(version = %head, "version not specified, using current git revision");
      head
    }
  };

  let ctx = BuildContext::new(version)?;
  ctx.dirs.ensure()?;

  vendor::fetch_sdl_source(&ctx.dirs.vendor, SDL_VERSION)?;
  archive::make_source_archive(&ctx.version, &ctx.dirs.vendor)?;

  for &target in targets {
    println!("{} Building {target}", "::".cyan().bold());
    let started = Instant::now();

    build_target(target, &ctx).with_context(|| format!("{target} build failed"))?;

    let elapsed = Duration::from_secs(started.elapsed().as_secs());
    println!(
      "{} Built {target} in {}",
      "::".green().bold(),
      humantime::format_duration(elapsed)
    );
  }

  Ok(())
}

/// Expand the selected target names into the list of targets to build.
///
/// No selection defaults to all targets. `all` is only valid on its own;
/// combining it with an explicit target returns `None` (a usage error).
/// Explicit selections are built in the order given.
fn resolve_targets(selected: &[TargetArg]) -> Option<Vec<Target>> {
  let has_all = selected.contains(&TargetArg::All);
  if has_all && selected.len() > 1 {
    return None;
  }
  if selected.is_empty() || has_all {
    return Some(Target::ALL.to_vec());
  }

  Some(
    selected
      .iter()
      .filter_map(|arg| match arg {
        TargetArg::All => None,
        TargetArg::Appimage => Some(Target::Appimage),
        TargetArg::Dos => Some(Target::Dos),
        TargetArg::Macos => Some(Target::Macos),
        TargetArg::Windows => Some(Target::Windows),
      })
      .collect(),
  )
}

fn init_tracing(debug: bool) {
  let default_filter = if debug { "debug" } else { "info" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

  tracing_subscriber::fmt().with_env_filter(filter).without_time().init();
}

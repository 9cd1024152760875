//! Synchronous external command execution.
//!
//! Everything runs blocking with inherited stderr so build output stays
//! visible. Commands are always argument vectors; nothing on the host side
//! goes through a shell.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, error};

use crate::error::{Error, Result};

/// Run a command with inherited stdio, failing on non-zero exit.
pub fn run<I, S>(program: &str, args: I) -> Result<()>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  run_inner(program, args, None)
}

/// Run a command from the given working directory.
pub fn run_in<I, S>(program: &str, args: I, dir: &Path) -> Result<()>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  run_inner(program, args, Some(dir))
}

fn run_inner<I, S>(program: &str, args: I, dir: Option<&Path>) -> Result<()>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
  let rendered = render(program, &args);
  debug!(command = %rendered, "running");

  let mut command = Command::new(program);
  command.args(&args);
  if let Some(dir) = dir {
    command.current_dir(dir);
  }

  let status = command.status().map_err(|e| Error::Spawn {
    command: rendered.clone(),
    source: e,
  })?;

  if !status.success() {
    return Err(Error::CommandFailed {
      command: rendered,
      code: status.code(),
    });
  }

  Ok(())
}

/// Run a command and capture its stdout as text; stderr stays inherited.
///
/// When the output contains exactly one newline, trailing whitespace is
/// stripped, so single-line results (a commit hash, a directory) come back
/// bare. Multi-line output is returned verbatim.
pub fn check_output<I, S>(program: &str, args: I) -> Result<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
  let rendered = render(program, &args);
  debug!(command = %rendered, "capturing output");

  let output = Command::new(program)
    .args(&args)
    .stderr(Stdio::inherit())
    .output()
    .map_err(|e| Error::Spawn {
      command: rendered.clone(),
      source: e,
    })?;

  if !output.status.success() {
    return Err(Error::CommandFailed {
      command: rendered,
      code: output.status.code(),
    });
  }

  let text = String::from_utf8(output.stdout).map_err(|e| Error::OutputNotUtf8 {
    command: rendered,
    source: e,
  })?;

  if text.matches('\n').count() == 1 {
    Ok(text.trim_end().to_string())
  } else {
    Ok(text)
  }
}

/// Probe that a required tool is invocable at all.
///
/// A spawn failure (the tool is absent) becomes [`Error::MissingTool`] with
/// the given diagnostic; a tool that runs but exits non-zero is reported as a
/// plain command failure instead.
pub fn validate_runs<I, S>(program: &str, args: I, message: &str) -> Result<()>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  match check_output(program, args) {
    Ok(_) => Ok(()),
    Err(Error::Spawn { command, source }) => {
      error!(command = %command, error = %source, "{message}");
      Err(Error::MissingTool {
        tool: program.to_string(),
        message: message.to_string(),
      })
    }
    Err(other) => Err(other),
  }
}

fn render(program: &str, args: &[OsString]) -> String {
  let mut rendered = program.to_string();
  for arg in args {
    rendered.push(' ');
    rendered.push_str(&arg.to_string_lossy());
  }
  rendered
}

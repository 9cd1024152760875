//! Error types for kevbuild-core.
//!
//! There is deliberately no retry or partial-failure taxonomy here: any
//! failing step aborts the whole invocation, so errors only need to say what
//! broke. The one distinguished case is [`Error::MissingTool`], which the CLI
//! maps to exit code 2.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while orchestrating a build.
#[derive(Debug, Error)]
pub enum Error {
  /// An external command ran but exited unsuccessfully.
  #[error("command '{command}' exited with {}", exit_description(*code))]
  CommandFailed { command: String, code: Option<i32> },

  /// An external command could not be spawned at all.
  #[error("failed to run '{command}': {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  /// A required external tool is not invocable. Maps to exit code 2.
  #[error("{message}")]
  MissingTool { tool: String, message: String },

  /// Captured command output was not valid UTF-8.
  #[error("output of '{command}' is not valid UTF-8: {source}")]
  OutputNotUtf8 {
    command: String,
    #[source]
    source: std::string::FromUtf8Error,
  },

  /// A downloaded artifact failed signature verification and was discarded.
  #[error("signature verification failed for '{artifact}'; download discarded")]
  SignatureRejected {
    artifact: String,
    #[source]
    source: Box<Error>,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Platform(#[from] kevbuild_platform::PlatformError),
}

fn exit_description(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("code {code}"),
    None => "a signal".to_string(),
  }
}

//! Error types for kevbuild-platform

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur resolving host state.
#[derive(Debug, Error)]
pub enum PlatformError {
  /// Failed to determine the current working directory.
  #[error("failed to determine current directory: {0}")]
  CurrentDir(#[source] std::io::Error),

  /// Failed to create one of the build directories.
  #[error("failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

//! Host abstractions for kevbuild
//!
//! This crate provides the pieces of the build orchestrator that talk to the
//! host rather than to external tools:
//! - the work/dist/platform/vendor directory set, resolved from environment
//!   variables
//! - the invoking user's identity, handed to containers so build artifacts
//!   are not owned by a privileged container user
//!
//! Builds run on a unix host: container mounts and uid:gid ownership have no
//! equivalent elsewhere, so other hosts are rejected at compile time.

#[cfg(not(unix))]
compile_error!("kevbuild requires a unix host; builds run as the invoking user's uid:gid");

mod error;
mod paths;
mod user;

pub use error::PlatformError;
pub use paths::BuildDirs;
pub use user::uid_gid;

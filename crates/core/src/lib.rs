//! Core build orchestration for kevbuild.
//!
//! This crate drives the KevEdit release pipeline: it caches third-party
//! vendor artifacts (fetch-if-missing), snapshots the repository into a
//! version-pinned zip archive, and runs the per-target containerized build
//! recipes. Everything external happens through child processes (`wget`,
//! `gpg`, `git`, `docker`); this crate only sequences them and propagates
//! failure.

pub mod archive;
pub mod build;
pub mod error;
pub mod process;
pub mod target;
pub mod vendor;

pub use build::{BuildContext, build_target};
pub use error::{Error, Result};
pub use target::Target;
pub use vendor::{APPIMAGE_VERSION, ISPACK_VERSION, SDL_VERSION};

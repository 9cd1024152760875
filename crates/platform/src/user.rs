//! Invoking-user identity.

/// The current user's `uid:gid`, as passed to `docker run -u`.
///
/// Containers run as this user so that files written into the mounted work
/// and dist directories are owned by the invoker rather than root.
pub fn uid_gid() -> String {
  use nix::unistd::{Gid, Uid};

  format!("{}:{}", Uid::current(), Gid::current())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uid_gid_is_two_numbers() {
    let id = uid_gid();
    let (uid, gid) = id.split_once(':').expect("expected uid:gid");

    uid.parse::<u32>().unwrap();
    gid.parse::<u32>().unwrap();
  }
}

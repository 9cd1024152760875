//! Build targets.

use std::fmt;
use std::str::FromStr;

/// A distributable output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  Appimage,
  Dos,
  Macos,
  Windows,
}

impl Target {
  /// Every target, in canonical build order.
  pub const ALL: [Target; 4] = [Target::Appimage, Target::Dos, Target::Macos, Target::Windows];

  pub fn as_str(&self) -> &'static str {
    match self {
      Target::Appimage => "appimage",
      Target::Dos => "dos",
      Target::Macos => "macos",
      Target::Windows => "windows",
    }
  }

  /// Tag of the container image built for this target.
  pub fn image_tag(&self) -> &'static str {
    match self {
      Target::Appimage => "kevedit/build_appimage",
      Target::Dos => "kevedit/build_dos",
      Target::Macos => "kevedit/build_macos",
      Target::Windows => "kevedit/build_windows",
    }
  }

  /// Image definition the container image is built from.
  pub fn dockerfile(&self) -> &'static str {
    match self {
      Target::Appimage => "Dockerfile.appimage",
      Target::Dos => "Dockerfile.dos",
      Target::Macos => "Dockerfile.macos",
      Target::Windows => "Dockerfile.windows",
    }
  }

  /// Build script invoked inside the container, as a container path.
  ///
  /// The appimage target shares the generic Linux build script.
  pub fn script(&self) -> &'static str {
    match self {
      Target::Appimage => "/platform/linux/build_linux.sh",
      Target::Dos => "/platform/dos/build_dos.sh",
      Target::Macos => "/platform/macos/build_macos.sh",
      Target::Windows => "/platform/windows/build_windows.sh",
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Target {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "appimage" => Ok(Target::Appimage),
      "dos" => Ok(Target::Dos),
      "macos" => Ok(Target::Macos),
      "windows" => Ok(Target::Windows),
      other => Err(format!("unknown target '{other}'")),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn all_targets_round_trip_through_names() {
    for target in Target::ALL {
      assert_eq!(target.as_str().parse::<Target>().unwrap(), target);
    }
  }

  #[test]
  fn all_is_in_canonical_order() {
    let names: Vec<&str> = Target::ALL.iter().map(Target::as_str).collect();
    assert_eq!(names, ["appimage", "dos", "macos", "windows"]);
  }

  #[test]
  fn unknown_target_is_rejected() {
    assert!("amiga".parse::<Target>().is_err());
    assert!("all".parse::<Target>().is_err());
  }

  #[test]
  fn container_naming_follows_target_name() {
    for target in Target::ALL {
      assert_eq!(target.image_tag(), format!("kevedit/build_{target}"));
      assert_eq!(target.dockerfile(), format!("Dockerfile.{target}"));
    }
  }
}

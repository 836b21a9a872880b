//! Homebrew prefix lookup by operating system and architecture.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOs,
    Linux,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Arm64,
    Amd64,
    Unknown,
}

impl Os {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Os::MacOs,
            "linux" => Os::Linux,
            _ => Os::Unknown,
        }
    }
}

impl Arch {
    pub fn current() -> Self {
        match std::env::consts::ARCH {
            "aarch64" => Arch::Arm64,
            "x86_64" => Arch::Amd64,
            _ => Arch::Unknown,
        }
    }
}

/// The prefix Homebrew installs into by default on a given platform.
pub fn default_prefix(os: Os, arch: Arch) -> PathBuf {
    match (os, arch) {
        (Os::MacOs, Arch::Arm64) => PathBuf::from("/opt/homebrew"),
        (Os::Linux, _) => PathBuf::from("/home/linuxbrew/.linuxbrew"),
        _ => PathBuf::from("/usr/local"),
    }
}

//! Platform family detection.
//!
//! The platform is probed once at startup and the same value is handed to
//! the prompt builder, the response validator, and the shell strategy so
//! all three stay consistent within a single invocation.

use std::fmt;

/// The OS family the assistant is generating commands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Detect the local platform family. Never fails: anything that is not
    /// Windows or macOS is treated as a generic Unix-like (Linux branch).
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    fn from_os_name(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Linux,
        }
    }

    /// The name used in the prompt and expected back in the model's
    /// `platform` field.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
        }
    }

    /// Whether a platform label declared by the model refers to this
    /// platform. Comparison is case-insensitive.
    pub fn matches_label(&self, label: &str) -> bool {
        label.trim().eq_ignore_ascii_case(self.name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

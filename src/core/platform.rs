//! Build target platforms
//!
//! A platform is the (os, arch, arm variant) triple a binary was built for.
//! Binaries are grouped by platform and every group becomes one package per
//! format.

use crate::error::PackagerError;
use std::{fmt, str::FromStr};

/// Build target of a binary
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Platform {
    pub os: String,
    pub arch: String,
    pub arm: Option<String>,
}

impl Platform {
    /// Create a new platform
    pub fn new(os: impl Into<String>, arch: impl Into<String>, arm: Option<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
            arm: arm.filter(|v| !v.is_empty()),
        }
    }

    /// Compact grouping key, e.g. `linuxamd64` or `linuxarm6`
    pub fn key(&self) -> String {
        format!(
            "{}{}{}",
            self.os,
            self.arch,
            self.arm.as_deref().unwrap_or_default()
        )
    }

    /// Architecture label understood by Linux package managers
    pub fn linux_arch(&self) -> String {
        match (self.arch.as_str(), self.arm.as_deref()) {
            ("amd64", _) => "amd64".to_string(),
            ("386", _) => "i386".to_string(),
            ("arm64", _) => "arm64".to_string(),
            ("arm", Some("5")) => "armel".to_string(),
            ("arm", Some("6" | "7")) => "armhf".to_string(),
            (arch, _) => arch.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arm {
            Some(arm) => write!(f, "{}/{}/{}", self.os, self.arch, arm),
            None => write!(f, "{}/{}", self.os, self.arch),
        }
    }
}

impl FromStr for Platform {
    type Err = PackagerError;

    /// Parse `os/arch` or `os/arch/arm`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').map(str::trim).collect();
        match parts.as_slice() {
            [os, arch] if !os.is_empty() && !arch.is_empty() => Ok(Self::new(*os, *arch, None)),
            [os, arch, arm] if !os.is_empty() && !arch.is_empty() => {
                Ok(Self::new(*os, *arch, Some((*arm).to_string())))
            }
            _ => Err(PackagerError::validation(format!(
                "invalid platform '{s}', expected os/arch or os/arch/arm"
            ))),
        }
    }
}

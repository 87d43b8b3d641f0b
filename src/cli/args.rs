//! Command-line argument parsing and validation

use crate::{core::platform::Platform, error::PackagerError};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::{path::PathBuf, str::FromStr};

/// fpm packager - build deb/rpm packages from released Linux binaries
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "fpm-packager")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Packaging configuration file (TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build packages for every format and Linux platform
    Package {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the fpm command lines without running them
    Plan {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Binaries and overrides shared by all commands
#[derive(ClapArgs, Debug, Default)]
pub struct InputArgs {
    /// Built binary as <os>/<arch>[/<arm>]=<path>, may be repeated
    #[arg(short = 'b', long = "binary", value_name = "PLATFORM=PATH")]
    pub binaries: Vec<BinaryInput>,

    /// Output format, may be repeated; overrides the configuration file
    #[arg(short = 'f', long = "format")]
    pub formats: Vec<String>,

    /// Project name
    #[arg(long)]
    pub project_name: Option<String>,

    /// Version being packaged
    #[arg(long = "release-version", value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Output directory for packages
    #[arg(short = 'o', long)]
    pub dist: Option<PathBuf>,

    /// Maximum number of concurrent fpm runs
    #[arg(short = 'p', long)]
    pub parallelism: Option<usize>,
}

/// A binary passed on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryInput {
    pub platform: Platform,
    pub path: PathBuf,
}

impl BinaryInput {
    /// File name the binary is installed under
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl FromStr for BinaryInput {
    type Err = PackagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (platform, path) = s.split_once('=').ok_or_else(|| {
            PackagerError::validation(format!("invalid binary '{s}', expected PLATFORM=PATH"))
        })?;

        let path = PathBuf::from(path.trim());
        if path.file_name().is_none() {
            return Err(PackagerError::validation(format!(
                "invalid binary '{s}', path has no file name"
            )));
        }

        Ok(Self {
            platform: platform.parse()?,
            path,
        })
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_args() {
        let args = Args::try_parse_from(["fpm-packager", "plan"]).unwrap();
        assert!(!args.debug);
        assert!(args.config.is_none());
        assert!(matches!(args.command, Command::Plan { .. }));
    }

    #[test]
    fn test_parse_debug_flag() {
        let args = Args::try_parse_from(["fpm-packager", "--debug", "package"]).unwrap();
        assert!(args.debug);
    }

    #[test]
    fn test_parse_package_with_options() {
        let args = Args::try_parse_from([
            "fpm-packager",
            "package",
            "--binary",
            "linux/amd64=target/app",
            "-b",
            "linux/arm/7=target/arm/app",
            "--format",
            "deb",
            "-f",
            "rpm",
            "--project-name",
            "app",
            "--release-version",
            "1.2.3",
            "-p",
            "2",
        ])
        .unwrap();

        match args.command {
            Command::Package { input } => {
                assert_eq!(input.binaries.len(), 2);
                assert_eq!(input.binaries[1].platform.arm.as_deref(), Some("7"));
                assert_eq!(input.binaries[1].name(), "app");
                assert_eq!(input.formats, vec!["deb", "rpm"]);
                assert_eq!(input.release_version.as_deref(), Some("1.2.3"));
                assert_eq!(input.parallelism, Some(2));
            }
            _ => panic!("Expected Package command"),
        }
    }

    #[test]
    fn test_invalid_binary_rejected() {
        assert!(Args::try_parse_from(["fpm-packager", "plan", "-b", "target/app"]).is_err());
        assert!(Args::try_parse_from(["fpm-packager", "plan", "-b", "linux=target/app"]).is_err());
    }
}

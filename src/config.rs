//! Configuration management for the packaging stage
//!
//! Centralizes configuration options, defaults and validation. Values come
//! from an optional TOML file and are overridden by command line flags.

use crate::{
    cli::{Args, Command, InputArgs},
    error::{PackagerError, Result},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path, path::PathBuf};
use tracing::{debug, warn};

/// Default directory packages are installed into
pub const DEFAULT_BINDIR: &str = "/usr/local/bin";

/// Default package file name template, without the format extension
pub const DEFAULT_NAME_TEMPLATE: &str =
    "{{ ProjectName }}_{{ Version }}_{{ Os }}_{{ Arch }}{{#if Arm}}v{{ Arm }}{{/if}}";

/// Logged whenever fpm packaging is configured
const FPM_DEPRECATION_NOTICE: &str =
    "DEPRECATED: fpm packaging should not be used anymore, switch to nfpm";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging and pass `--debug` to fpm
    pub debug: bool,
    /// Project name used as the package name
    pub project_name: String,
    /// Version being released
    pub version: String,
    /// Git tag of the release, defaults to the version
    pub tag: Option<String>,
    /// Output directory for produced packages
    pub dist: PathBuf,
    /// Maximum number of concurrent fpm invocations
    pub parallelism: usize,
    /// Package configuration
    pub fpm: FpmConfig,
}

/// Package configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FpmConfig {
    /// Output formats, e.g. deb and rpm
    pub formats: Vec<String>,
    /// Directory binaries are installed into
    pub bindir: String,
    /// Template for the package file name
    pub name_template: String,
    pub vendor: Option<String>,
    pub homepage: Option<String>,
    pub maintainer: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    /// Packages this package depends on
    pub dependencies: Vec<String>,
    /// Packages this package conflicts with
    pub conflicts: Vec<String>,
    /// Extra files to add, source path to installed path
    pub files: IndexMap<String, String>,
    /// Replacements applied to os, arch and arm in the name template
    pub replacements: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            project_name: String::new(),
            version: String::new(),
            tag: None,
            dist: PathBuf::from("dist"),
            parallelism: num_cpus::get(),
            fpm: FpmConfig::default(),
        }
    }
}

impl Default for FpmConfig {
    fn default() -> Self {
        Self {
            formats: Vec::new(),
            bindir: DEFAULT_BINDIR.to_string(),
            name_template: DEFAULT_NAME_TEMPLATE.to_string(),
            vendor: None,
            homepage: None,
            maintainer: None,
            description: None,
            license: None,
            dependencies: Vec::new(),
            conflicts: Vec::new(),
            files: IndexMap::new(),
            replacements: HashMap::new(),
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.debug |= args.debug;

        match &args.command {
            Command::Package { input } | Command::Plan { input } => config.merge_input(input),
        }

        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| PackagerError::file_system("read", path, e))?;

        toml::from_str(&content).map_err(|e| {
            PackagerError::config_with_source(
                format!("invalid configuration file {}", path.display()),
                e,
            )
        })
    }

    /// Override file values with the ones given on the command line
    fn merge_input(&mut self, input: &InputArgs) {
        if let Some(name) = &input.project_name {
            self.project_name.clone_from(name);
        }
        if let Some(version) = &input.release_version {
            self.version.clone_from(version);
        }
        if let Some(dist) = &input.dist {
            self.dist.clone_from(dist);
        }
        if let Some(parallelism) = input.parallelism {
            self.parallelism = parallelism;
        }
        if !input.formats.is_empty() {
            self.fpm.formats.clone_from(&input.formats);
        }
    }

    /// Fill in defaults for values left empty
    pub fn apply_defaults(&mut self) {
        if self.fpm.bindir.is_empty() {
            self.fpm.bindir = DEFAULT_BINDIR.to_string();
        }
        if self.fpm.name_template.is_empty() {
            self.fpm.name_template = DEFAULT_NAME_TEMPLATE.to_string();
        }
        if self.tag.is_none() {
            self.tag = Some(self.version.clone());
        }
        if !self.fpm.formats.is_empty() {
            warn!("{}", FPM_DEPRECATION_NOTICE);
        }
        // A zero-capacity admission gate would never admit a task
        self.parallelism = self.parallelism.max(1);
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(PackagerError::validation("project name is not set"));
        }

        if self.version.trim().is_empty() {
            return Err(PackagerError::validation("version is not set"));
        }

        if self.fpm.formats.iter().any(|f| f.trim().is_empty()) {
            return Err(PackagerError::validation("empty package format configured"));
        }

        Ok(())
    }

    /// Release tag, falling back to the version
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.version)
    }
}

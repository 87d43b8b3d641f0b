//! fpm invocation model
//!
//! A [`PackageSpec`] describes one package to produce. [`PackageSpec::to_args`]
//! turns it into the exact argument list handed to fpm; fpm depends on the
//! ordering, so it is fixed here and covered by tests.

use std::path::{Path, PathBuf};

/// A binary to install into the package's bindir
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMapping {
    /// Path of the built binary on disk
    pub source: PathBuf,
    /// File name inside the bindir
    pub name: String,
}

/// Declarative description of a single package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSpec {
    pub format: String,
    pub architecture: String,
    pub name: String,
    pub version: String,
    pub vendor: Option<String>,
    pub homepage: Option<String>,
    pub maintainer: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub dependencies: Vec<String>,
    pub conflicts: Vec<String>,
    pub binaries: Vec<BinaryMapping>,
    /// Extra files as (source, destination) pairs
    pub files: Vec<(String, String)>,
    pub bindir: String,
    /// Package file to write
    pub package: PathBuf,
    /// Scratch directory for fpm
    pub workdir: PathBuf,
    pub debug: bool,
}

impl PackageSpec {
    /// Build the fpm argument list
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--input-type".into(),
            "dir".into(),
            "--output-type".into(),
            self.format.clone(),
            "--name".into(),
            self.name.clone(),
            "--version".into(),
            self.version.clone(),
            "--architecture".into(),
            self.architecture.clone(),
            "--package".into(),
            path_arg(&self.package),
            "--force".into(),
            "--workdir".into(),
            path_arg(&self.workdir),
        ];

        let optional = [
            ("--vendor", &self.vendor),
            ("--url", &self.homepage),
            ("--maintainer", &self.maintainer),
            ("--description", &self.description),
            ("--license", &self.license),
        ];
        for (flag, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                args.push(flag.into());
                args.push(value.into());
            }
        }

        for dep in &self.dependencies {
            args.push("--depends".into());
            args.push(dep.clone());
        }
        for conflict in &self.conflicts {
            args.push("--conflicts".into());
            args.push(conflict.clone());
        }

        // source=destination tells fpm where to place each input file
        for binary in &self.binaries {
            let destination = Path::new(&self.bindir).join(&binary.name);
            args.push(format!(
                "{}={}",
                binary.source.display(),
                destination.display()
            ));
        }
        for (source, destination) in &self.files {
            args.push(format!("{source}={destination}"));
        }

        if self.debug {
            args.push("--debug".into());
        }

        // fpm needs the target OS spelled out for rpm
        if self.format == "rpm" {
            args.push("--rpm-os".into());
            args.push("linux".into());
        }

        args
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

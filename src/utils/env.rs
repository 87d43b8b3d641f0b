//! Environment handling for external tools
//!
//! fpm shells out to `tar`, and the BSD tar shipped with macOS produces
//! archives it cannot read. Homebrew's GNU tar is put in front of PATH so it
//! wins when present; on Linux the extra entry is harmless.

use std::ffi::{OsStr, OsString};
use tracing::debug;

/// GNU tar location when installed with Homebrew on macOS
pub const GNU_TAR_PATH: &str = "/usr/local/opt/gnu-tar/libexec/gnubin";

/// Build a child environment with `prefix` prepended to PATH.
///
/// Every other variable is passed through unchanged. The original PATH entry
/// is dropped so the child sees exactly one.
pub fn prefixed_path_env<I>(prefix: &str, vars: I) -> Vec<(OsString, OsString)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut original_path = None;
    let mut rest = Vec::new();

    for (key, value) in vars {
        if key == OsStr::new("PATH") {
            original_path = Some(value);
        } else {
            rest.push((key, value));
        }
    }

    let mut path = OsString::from(prefix);
    path.push(":");
    if let Some(original) = original_path {
        path.push(original);
    }
    debug!("Tool PATH: {}", path.to_string_lossy());

    let mut env = Vec::with_capacity(rest.len() + 1);
    env.push((OsString::from("PATH"), path));
    env.extend(rest);
    env
}

/// Environment of the current process with `prefix` prepended to PATH
pub fn tool_env(prefix: &str) -> Vec<(OsString, OsString)> {
    prefixed_path_env(prefix, std::env::vars_os())
}

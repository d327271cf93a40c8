//! Process-wide location of the gnuplot executable
//!
//! The path is fixed at most once per process: either explicitly through
//! [`set_custom_path`] before the first session is created, or by the first
//! call to [`resolve`]. Once fixed it never changes.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{GnuplotError, GnuplotResult};

/// Environment variable consulted before searching `PATH`
pub const GNUPLOT_ENV: &str = "IMPLORE_GNUPLOT";

static GNUPLOT_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Platform specific executable name
pub fn executable_name() -> &'static str {
    if cfg!(windows) {
        "gnuplot.exe"
    } else {
        "gnuplot"
    }
}

/// Fix the gnuplot path for this process
///
/// Fails once a path has been set or resolved.
pub fn set_custom_path(path: impl Into<PathBuf>) -> GnuplotResult<()> {
    let path = path.into();
    GNUPLOT_PATH.set(path).map_err(|_| {
        GnuplotError::ExecutableAlreadyConfigured {
            path: configured().map(Path::to_path_buf).unwrap_or_default(),
        }
    })
}

/// The fixed path, if any
pub fn configured() -> Option<&'static Path> {
    GNUPLOT_PATH.get().map(PathBuf::as_path)
}

/// Return the gnuplot path, resolving and fixing it on first use
pub fn resolve() -> GnuplotResult<&'static Path> {
    if let Some(path) = configured() {
        return Ok(path);
    }

    let found = match env::var_os(GNUPLOT_ENV) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => search_path(executable_name(), env::var_os("PATH").as_deref()).ok_or_else(|| {
            GnuplotError::ExecutableNotFound {
                name: executable_name().to_string(),
            }
        })?,
    };

    tracing::debug!("Resolved gnuplot executable to {:?}", found);
    // A concurrent caller may have won the race; either way the stored value is used.
    let _ = GNUPLOT_PATH.set(found);
    configured().ok_or_else(|| GnuplotError::ExecutableNotFound {
        name: executable_name().to_string(),
    })
}

/// Find `name` in a `PATH`-style list of directories
pub fn search_path(name: &str, path_var: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

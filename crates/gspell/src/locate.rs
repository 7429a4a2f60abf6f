use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Executable name searched for on `PATH`.
pub const ENGINE_NAME: &str = "ispell";

/// Directories to search, in order. An empty component means the current
/// directory.
pub fn search_dirs(path_var: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| {
            if dir.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                dir
            }
        })
        .collect()
}

/// Find the engine on `path_var`.
pub fn locate_engine(path_var: Option<&OsStr>) -> Option<PathBuf> {
    let found = search_dirs(path_var?)
        .into_iter()
        .map(|dir| dir.join(ENGINE_NAME))
        .find(|candidate| is_executable(candidate));
    debug!(engine = ?found, "searched PATH for engine");
    found
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

//! Locations next to the executable: preferences, catalog, assets, and
//! exported snapshots all live there when run as a standalone exe.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Directory exported snapshots are written to.
pub fn images_directory() -> PathBuf {
    exe_directory().join("images")
}

/// Per-user data directory for the storage file, or the exe directory when
/// the platform has none.
pub fn data_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "ShinyDex")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(exe_directory)
}

//! File System Utilities
//!
//! Configuration and data directory management.

use crate::constants::{PROJECT_APPLICATION, PROJECT_ORGANIZATION, PROJECT_QUALIFIER};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION).ok_or_else(
        || Error::Invalid {
            message: "Could not determine project directories".to_string(),
        },
    )
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/chroma-demo/` or `$XDG_CONFIG_HOME/chroma-demo/`
/// - **macOS**: `~/Library/Application Support/com.chroma-demo.chroma-demo/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\chroma-demo\chroma-demo\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.config_dir())
}

/// Get the data directory for persisted widget records and logs
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/chroma-demo/`
/// - **macOS**: `~/Library/Application Support/com.chroma-demo.chroma-demo/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\chroma-demo\chroma-demo\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_dirs() {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = root.path().join("config").join("chroma-demo");

        assert_eq!(ensure_dir(&dir).expect("create"), dir);
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_keeps_existing_files() {
        let root = tempfile::tempdir().expect("tempdir");
        let record = root.path().join("componentConfig.json");
        fs::write(&record, "{}").expect("write");

        ensure_dir(root.path()).expect("existing dir");

        assert_eq!(fs::read_to_string(&record).expect("read"), "{}");
    }
}

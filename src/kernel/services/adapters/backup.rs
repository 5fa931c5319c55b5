//! Application data paths: backups, logs and settings.
//!
//! - macOS: ~/Library/Application Support/zhex
//! - Linux: $XDG_DATA_HOME/zhex or ~/.local/share/zhex
//! - Windows: %APPDATA%\zhex
//!
//! A backup for a document lives at `backups/<hash>.bak`; its locator is what
//! the host passes as `backupId` when restoring.

use crate::kernel::DocumentUri;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

const APP_NAME: &str = "zhex";
const BACKUP_DIR: &str = "backups";
const LOG_DIR: &str = "logs";
const BACKUP_EXT: &str = "bak";

pub(crate) fn get_app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_NAME)
        })
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            Some(PathBuf::from(xdg).join(APP_NAME))
        } else {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME))
        }
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

fn hash_uri(uri: &DocumentUri) -> String {
    let mut hasher = DefaultHasher::new();
    uri.as_str().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

pub fn get_backup_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(BACKUP_DIR))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

pub fn backup_path_for(uri: &DocumentUri) -> Option<PathBuf> {
    get_backup_dir().map(|dir| dir.join(format!("{}.{}", hash_uri(uri), BACKUP_EXT)))
}

/// The backup locator for `uri`, if a backup file currently exists.
pub fn find_backup(uri: &DocumentUri) -> Option<DocumentUri> {
    let path = backup_path_for(uri)?;
    path.is_file().then(|| DocumentUri::from_path(&path))
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine log directory",
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/backup.rs"]
mod tests;

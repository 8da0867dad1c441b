//! Default-folder validation and display helpers.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FolderError {
    #[error("Folder does not exist: {0}")]
    Missing(PathBuf),
    #[error("Not a folder: {0}")]
    NotADirectory(PathBuf),
    #[error("The folder must be in your home directory")]
    OutsideHome(PathBuf),
}

/// The current user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Check that `path` is an existing directory inside `home`.
///
/// The containment check is lexical: `..` components are rejected rather
/// than resolved, and symlinks are taken as given.
pub fn validate_default_folder(path: &Path, home: &Path) -> Result<(), FolderError> {
    if !path.exists() {
        return Err(FolderError::Missing(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(FolderError::NotADirectory(path.to_path_buf()));
    }
    // starts_with is lexical, so a path with `..` components could match the
    // home prefix and still resolve elsewhere.
    let climbs = path.components().any(|c| c == Component::ParentDir);
    if climbs || !path.starts_with(home) {
        return Err(FolderError::OutsideHome(path.to_path_buf()));
    }
    Ok(())
}

/// Rewrite `path` with the home prefix collapsed to `~` for storage and display.
///
/// Paths outside `home` are returned unchanged.
pub fn collapse_home(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

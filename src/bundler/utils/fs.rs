//! File system utilities for packaging.
//!
//! Directory walking, staging directory setup and file copies with path
//! context on every failure.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Flat listing of an application directory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DirectoryStructure {
    /// Every regular file, in walk order.
    pub files: Vec<PathBuf>,
    /// Every directory below the root (the root itself excluded).
    pub directories: Vec<PathBuf>,
}

impl DirectoryStructure {
    /// Drops `prefix` and everything below it.
    pub fn without(mut self, prefix: &Path) -> Self {
        let before = self.files.len() + self.directories.len();
        self.files.retain(|path| !path.starts_with(prefix));
        self.directories.retain(|path| !path.starts_with(prefix));
        log::debug!(
            "Excluded {} entries below {}",
            before - self.files.len() - self.directories.len(),
            prefix.display()
        );
        self
    }
}

/// Walks `root` and lists its files and directories.
///
/// Symlinks are not followed. The walk runs on the blocking pool.
pub async fn get_directory_structure(root: &Path) -> Result<DirectoryStructure> {
    if !root.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut structure = DirectoryStructure::default();
        for entry in walkdir::WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }
            if entry.file_type().is_dir() {
                structure.directories.push(entry.into_path());
            } else if entry.file_type().is_file() {
                structure.files.push(entry.into_path());
            }
        }
        log::debug!(
            "Found {} files in {} directories below {}",
            structure.files.len(),
            structure.directories.len(),
            root.display()
        );
        Ok(structure)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory walk task panicked: {e}")))?
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        match fs::remove_dir_all(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).fs_context("clearing directory", path),
        }
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating destination directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

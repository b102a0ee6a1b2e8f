//! Filesystem access rooted at an explicit repository directory.
//!
//! Every path handed to a [Workspace] is relative to its root. Nothing here
//! consults the process working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operations needed to prepare a development branch.
pub trait Workspace {
    /// Directory every relative path is resolved against.
    fn root(&self) -> &Path;

    /// Recursively delete the directory at `relative`.
    ///
    /// # Returns
    /// * `Ok(true)` - The directory existed and was removed
    /// * `Ok(false)` - No directory at that path; nothing was touched
    /// * `Err` - The directory exists but could not be removed
    fn remove_dir_if_exists(&self, relative: &Path) -> io::Result<bool>;

    /// Read a UTF-8 file, returning `Ok(None)` when it does not exist.
    fn read_file(&self, relative: &Path) -> io::Result<Option<String>>;

    /// Replace the contents of a file.
    fn write_file(&self, relative: &Path, contents: &str) -> io::Result<()>;
}

/// [Workspace] backed by the local disk.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalWorkspace { root: root.into() }
    }

    fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

impl Workspace for LocalWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn remove_dir_if_exists(&self, relative: &Path) -> io::Result<bool> {
        let path = self.resolve(relative);
        // symlink_metadata so a symlinked directory is never followed
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(&path)?;
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn read_file(&self, relative: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(self.resolve(relative)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_file(&self, relative: &Path, contents: &str) -> io::Result<()> {
        fs::write(self.resolve(relative), contents)
    }
}

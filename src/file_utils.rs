use anyhow::{Result, Context};
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Files directly inside `dir` with the given extension, sorted by name.
    ///
    /// The extension is compared exactly, with or without a leading dot.
    /// An entry that cannot be inspected (a dangling symlink, for example) is
    /// still returned when its name matches, so opening it reports the cause.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.strip_prefix('.').unwrap_or(extension);
        let mut result = Vec::new();

        for entry in Self::direct_children(dir.as_ref()) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && Self::has_extension(path, wanted) {
                        result.push(path.to_path_buf());
                    }
                }
                Err(error) => match Self::unreadable_child(error)? {
                    Some(path) if Self::has_extension(&path, wanted) => result.push(path),
                    _ => {}
                },
            }
        }

        Ok(result)
    }

    /// Subdirectories directly inside `dir`, sorted by name
    pub fn find_subdirs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in Self::direct_children(dir.as_ref()) {
            match entry {
                Ok(entry) if entry.path().is_dir() => result.push(entry.into_path()),
                Ok(_) => {}
                Err(error) => {
                    Self::unreadable_child(error)?;
                }
            }
        }

        Ok(result)
    }

    fn has_extension(path: &Path, wanted: &str) -> bool {
        path.extension().is_some_and(|ext| ext == wanted)
    }

    // Failing to read `dir` itself is an error; a single bad child is only
    // logged and its path handed back
    fn unreadable_child(error: walkdir::Error) -> Result<Option<PathBuf>> {
        if error.depth() == 0 {
            return Err(error).context("Failed to read directory");
        }

        warn!("Cannot inspect directory entry: {}", error);
        Ok(error.path().map(Path::to_path_buf))
    }

    fn direct_children(dir: &Path) -> walkdir::IntoIter {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
    }
}

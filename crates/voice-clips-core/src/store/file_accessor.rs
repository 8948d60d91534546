use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Directory entry with the timestamp used for ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Creation time, or modification time where the filesystem has none.
    pub created: SystemTime,
}

/// Filesystem operations the recording store needs (allows mocking in tests).
pub trait FileAccessor: Send + Sync {
    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// List regular files in `dir`.
    ///
    /// The outer error means the directory itself could not be read; inner
    /// errors are per-entry stat failures.
    fn list(&self, dir: &Path) -> io::Result<Vec<io::Result<ListedFile>>>;
}

/// [`FileAccessor`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileAccessor;

impl FileAccessor for SystemFileAccessor {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<io::Result<ListedFile>>> {
        let entries = fs::read_dir(dir)?
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(e)),
                };
                let path = entry.path();
                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(e) => return Some(Err(e)),
                };
                if !metadata.is_file() {
                    return None;
                }
                // Not every filesystem records a birth time.
                let created = metadata.created().or_else(|_| metadata.modified());
                Some(created.map(|created| ListedFile { path, created }))
            })
            .collect();

        Ok(entries)
    }
}

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Stable reference to a recording's backing file.
///
/// Joins the filesystem, the name override store and catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileRef(PathBuf);

impl FileRef {
    /// Wrap a path as a file reference.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// String form used as the key in persisted stores.
    pub fn key(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }

    /// Final path component, or the full key when there is none.
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.key())
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for FileRef {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

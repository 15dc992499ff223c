use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// Reads files below a fixed root directory.
///
/// Names that are absolute, contain `..`, or resolve (through symlinks) to somewhere
/// outside the root are reported as not found, so a request can never read past the root.
#[derive(Debug, Clone)]
pub struct FileReader {
    root: PathBuf,
}

impl FileReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the contents of `relative_name` under the root.
    ///
    /// Rejected names fail with [`io::ErrorKind::NotFound`]; other failures carry the
    /// underlying I/O error.
    pub async fn read_file(&self, relative_name: &str) -> io::Result<Vec<u8>> {
        let relative = Path::new(relative_name);
        if relative_name.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
            debug!(name = relative_name, "rejecting file name");
            return Err(io::Error::new(io::ErrorKind::NotFound, "file name escapes the static root"));
        }

        let root = tokio::fs::canonicalize(&self.root).await?;
        let path = tokio::fs::canonicalize(root.join(relative)).await?;
        if !path.starts_with(&root) {
            debug!(name = relative_name, resolved = %path.display(), "file resolves outside the static root");
            return Err(io::Error::new(io::ErrorKind::NotFound, "file resolves outside the static root"));
        }

        tokio::fs::read(&path).await
    }
}

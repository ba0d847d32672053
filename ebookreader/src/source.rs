//! Source locators and the resolver that opens them

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// Opaque reference to content outside app storage, used at import time
/// and as a read fallback.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocator(String);

impl SourceLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem path for `file://` URIs and bare paths, `None` for any
    /// other scheme.
    pub fn to_path(&self) -> Option<PathBuf> {
        if let Some(rest) = self.0.strip_prefix(FILE_SCHEME) {
            return Some(PathBuf::from(rest));
        }
        if self.0.contains("://") {
            return None;
        }
        Some(PathBuf::from(&self.0))
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Path> for SourceLocator {
    fn from(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for SourceLocator {
    fn from(path: PathBuf) -> Self {
        Self::from(path.as_path())
    }
}

/// Opens a source locator as a byte stream
pub trait ContentResolver: Send + Sync {
    fn open(&self, locator: &SourceLocator) -> io::Result<Box<dyn Read + Send>>;
}

/// Resolves `file://` URIs and plain paths on the local filesystem
pub struct FsResolver;

impl ContentResolver for FsResolver {
    fn open(&self, locator: &SourceLocator) -> io::Result<Box<dyn Read + Send>> {
        match locator.to_path() {
            Some(path) => Ok(Box::new(File::open(path)?)),
            None => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported source locator: {}", locator),
            )),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_path() {
        assert_eq!(
            SourceLocator::new("file:///tmp/book.txt").to_path(),
            Some(PathBuf::from("/tmp/book.txt"))
        );
        assert_eq!(
            SourceLocator::new("/tmp/book.txt").to_path(),
            Some(PathBuf::from("/tmp/book.txt"))
        );
        assert_eq!(SourceLocator::new("content://media/42").to_path(), None);
    }

    #[test]
    fn test_fs_resolver_reads_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(&path, "chapter one\n").unwrap();

        let locator = SourceLocator::new(format!("file://{}", path.display()));
        let mut content = String::new();
        FsResolver
            .open(&locator)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "chapter one\n");
    }

    #[test]
    fn test_fs_resolver_rejects_other_schemes() {
        let err = FsResolver
            .open(&SourceLocator::new("content://media/42"))
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}

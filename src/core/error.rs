use std::fmt;
use std::io;
use std::path::PathBuf;

/// Structural failures that abort an organization run.
///
/// Per-file failures during migration are handled at single-file scope and
/// never surface as this type.
#[derive(Debug)]
pub enum OrganizeError {
    /// A required source root does not exist or is not a directory.
    MissingRoot(PathBuf),
    /// The filesystem refused to create part of the output tree.
    CreateDir(PathBuf, io::Error),
    /// I/O failure while enumerating a source directory.
    Io(io::Error),
}

impl fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganizeError::MissingRoot(path) => write!(f, "Missing directory: {:?}", path),
            OrganizeError::CreateDir(path, e) => write!(f, "Failed to create {:?}: {}", path, e),
            OrganizeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for OrganizeError {}

impl From<io::Error> for OrganizeError {
    fn from(error: io::Error) -> Self {
        OrganizeError::Io(error)
    }
}

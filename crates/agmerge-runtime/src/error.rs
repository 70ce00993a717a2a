use std::fmt;
use std::path::PathBuf;

/// Result type for agmerge-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Fragment discovery or output writing failed
    Storage(agmerge_io::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Target directory does not exist
    DirectoryNotFound(PathBuf),

    /// Target path exists but is not a directory
    NotADirectory(PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage(err) => write!(f, "Storage error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::DirectoryNotFound(path) => {
                write!(f, "Directory not found: {}", path.display())
            }
            Error::NotADirectory(path) => write!(f, "Not a directory: {}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Storage(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::DirectoryNotFound(_) | Error::NotADirectory(_) => None,
        }
    }
}

impl From<agmerge_io::Error> for Error {
    fn from(err: agmerge_io::Error) -> Self {
        Error::Storage(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

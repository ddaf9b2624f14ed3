use std::io;
use std::path::{Path, PathBuf};

/// Failures reading the history log or listing a directory.
///
/// Callers branch on [`Error::is_not_found`]: a missing resource is routine during
/// interactive use (first run, half-typed paths) and degrades to an empty result,
/// while other I/O failures are worth a log line. Neither stops the shell.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file or directory does not exist.
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// Any other I/O failure (permissions, not a directory, ...).
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Classify an [`io::Error`] raised while accessing `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Error::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

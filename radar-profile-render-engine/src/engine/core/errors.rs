use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while ingesting radar profiles from disk.
///
/// None of these are fatal to the host: a failed table or image drops the
/// affected profile, a malformed record drops one line.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list profile directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("no radius known for reference body {0}")]
    UnknownBody(String),
}

impl ProfileError {
    /// Classify an io error raised while opening `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => ProfileError::FileNotFound(path),
            _ => ProfileError::FileUnreadable { path, source },
        }
    }
}

pub type ProfileResult<T> = Result<T, ProfileError>;

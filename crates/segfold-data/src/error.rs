use std::path::PathBuf;

/// All errors that can occur while indexing or reading a segmentation dataset.
///
/// Every failure is surfaced to the caller. The only "missing file" case that
/// is not an error is a background sample, which has no target by design.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The dataset root is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Discovery produced zero samples.
    #[error(
        "found 0 files in subfolders of: {}\nsupported extensions are: {}",
        .root.display(),
        .extensions.join(",")
    )]
    NoSamples {
        root: PathBuf,
        extensions: Vec<String>,
    },

    /// Sample index past the end of the dataset.
    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// An image (input or target) could not be opened or decoded.
    #[error("failed to decode {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// Directory traversal failed part-way.
    #[error("directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Builder or split parameters are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DataError {
    /// Create an `InvalidConfig` error from any message.
    pub fn config(msg: impl Into<String>) -> Self {
        DataError::InvalidConfig(msg.into())
    }
}

/// Convenience Result type used throughout segfold-data.
pub type Result<T> = std::result::Result<T, DataError>;

use std::path::PathBuf;

/// All errors that can occur while scoring or visualizing predictions.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Label and score arrays differ in length.
    #[error("length mismatch: {labels} labels vs {scores} scores")]
    LengthMismatch { labels: usize, scores: usize },

    /// ROC is undefined when the ground truth holds only one class.
    #[error("ROC undefined: {positives} positive and {negatives} negative samples")]
    SingleClass { positives: usize, negatives: usize },

    /// `auc` needs x sorted in one direction.
    #[error("x is neither increasing nor decreasing")]
    NotMonotonic,

    #[error("at least 2 points are needed to compute an area, got {0}")]
    TooFewPoints(usize),

    /// Two images that must align have different sizes.
    #[error("shape mismatch: {expected:?} vs {got:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        got: (u32, u32),
    },

    /// A required experiment directory does not exist.
    #[error("missing directory: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("image error on {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The annotation font could not be read or parsed.
    #[error("invalid font file: {}", .0.display())]
    Font(PathBuf),

    #[error("directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type used throughout segfold-eval.
pub type Result<T> = std::result::Result<T, EvalError>;

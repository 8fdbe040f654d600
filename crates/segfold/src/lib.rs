//! # segfold
//!
//! Tooling for image-segmentation experiments.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use segfold::prelude::*;
//!
//! let ds = SegmentationFolder::builder("data/train").patch_size(256).build()?;
//! let (input, target, area, label) = ds.get(0)?.into_parts();
//! # Ok::<(), segfold::data::DataError>(())
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `segfold-data` | Sample discovery, loading, paired transforms, splits |
//! | `segfold-eval` | ROC-AUC scoring, mask overlays, experiment batch jobs |
//!
//! The `segfold` binary wraps both behind `index`, `inspect`, `auc`, `vis`
//! and `vis-all` subcommands.

/// Re-export the dataset crate.
pub mod data {
    pub use segfold_data::*;
}

/// Re-export the evaluation crate.
pub mod eval {
    pub use segfold_eval::*;
}

/// Plain-text reports printed by the CLI.
pub mod report;

/// Commonly used types.
pub mod prelude {
    pub use segfold_data::{
        ChannelMode, Classifier, Dataset, DirectoryMarkerClassifier, PairedTransform, SampleClass,
        SampleRecord, SegmentationFolder, SegmentationSample, TargetPath,
    };
    pub use segfold_eval::{mask_roc_auc, EvalConfig, Experiment, FileAuc};
}

/// Install the global tracing subscriber.
///
/// The filter is read from `SEGFOLD_LOG` (e.g. `debug`, `segfold_data=debug`)
/// and defaults to `info`. Calling it twice is harmless.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SEGFOLD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

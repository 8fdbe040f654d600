//! # segfold-data
//!
//! Dataset discovery and sample loading for segmentation training.
//!
//! This crate provides:
//! - [`SegmentationFolder`]: indexes `(image, mask, label)` triples from a
//!   directory tree and loads them on demand
//! - [`Classifier`]: pluggable policy deciding labels and mask locations
//! - [`ImageLoader`]: decoding collaborator with an explicit [`ChannelMode`]
//! - [`PairedTransform`]: joint input/mask transforms and augmentations
//! - [`Dataset`] trait, subsets and reproducible train/test splits
//!
//! Discovery order is directory traversal order, sorted by name unless
//! disabled on the builder. Background samples get a blank mask of
//! `patch_size x patch_size`.

pub mod area;
pub mod augment;
pub mod classify;
pub mod combinators;
pub mod dataset;
pub mod decode;
pub mod discover;
pub mod error;
pub mod record;
pub mod segmentation_folder;
pub mod transform;

pub use area::mask_area;
pub use augment::{
    ColorJitter, GaussianNoise, PairedHorizontalFlip, PairedRandomCrop, PairedVerticalFlip,
};
pub use classify::{Classifier, DirectoryMarkerClassifier};
pub use combinators::{train_test_split, SubsetDataset};
pub use dataset::{Dataset, SegmentationSample};
pub use decode::{ChannelMode, FsImageLoader, ImageLoader};
pub use discover::{default_extensions, discover, has_allowed_extension, IMG_EXTENSIONS};
pub use error::{DataError, Result};
pub use record::{SampleClass, SampleRecord, TargetPath};
pub use segmentation_folder::{SegmentationFolder, SegmentationFolderBuilder, DEFAULT_PATCH_SIZE};
pub use transform::{Compose, PairedResize, PairedTransform};

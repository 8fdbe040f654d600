// Dataset trait - unified interface for indexed sample sources

use image::{GrayImage, RgbImage};

use crate::error::Result;

/// One segmentation sample as handed to the training loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationSample {
    /// RGB input image.
    pub input: RgbImage,
    /// Single-channel mask; all zero for background samples.
    pub target: GrayImage,
    /// Auxiliary statistic of the mask, see [`mask_area`](crate::mask_area).
    pub area: f32,
    /// 0 (background), 1 (positive) or 2 (verified positive).
    pub label: u8,
}

impl SegmentationSample {
    /// Split into the `(input, target, area, label)` tuple.
    pub fn into_parts(self) -> (RgbImage, GrayImage, f32, u8) {
        (self.input, self.target, self.area, self.label)
    }
}

/// A dataset is an indexed collection of samples.
///
/// Implementations must be `Send + Sync` so external loaders can read from
/// several worker threads.
pub trait Dataset: Send + Sync {
    type Item;

    /// Total number of samples in the dataset.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve the sample at position `index`.
    ///
    /// # Errors
    /// Fails with `IndexOutOfRange` if `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Optional human-readable name.
    fn name(&self) -> &str {
        "dataset"
    }
}

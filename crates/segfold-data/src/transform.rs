// Transform - joint preprocessing of an (input, mask) pair

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

/// A transform applied to the input image and its mask together.
///
/// Geometric transforms must move both images identically so the mask keeps
/// lining up with the input.
pub trait PairedTransform: Send + Sync {
    fn apply(&self, input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage);

    fn name(&self) -> &str {
        "transform"
    }
}

impl<F> PairedTransform for F
where
    F: Fn(RgbImage, GrayImage) -> (RgbImage, GrayImage) + Send + Sync,
{
    fn apply(&self, input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage) {
        self(input, target)
    }
}

/// Chain multiple transforms.
pub struct Compose {
    transforms: Vec<Box<dyn PairedTransform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn PairedTransform>>) -> Self {
        Self { transforms }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl PairedTransform for Compose {
    fn apply(&self, mut input: RgbImage, mut target: GrayImage) -> (RgbImage, GrayImage) {
        for t in &self.transforms {
            (input, target) = t.apply(input, target);
        }
        (input, target)
    }

    fn name(&self) -> &str {
        "Compose"
    }
}

/// Resize both images to `(width, height)`.
///
/// The input is resampled with a triangle filter; the mask uses nearest
/// neighbour so its values stay within the original label set.
#[derive(Debug, Clone)]
pub struct PairedResize {
    pub width: u32,
    pub height: u32,
}

impl PairedResize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl PairedTransform for PairedResize {
    fn apply(&self, input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage) {
        let input = imageops::resize(&input, self.width, self.height, FilterType::Triangle);
        let target = imageops::resize(&target, self.width, self.height, FilterType::Nearest);
        (input, target)
    }

    fn name(&self) -> &str {
        "PairedResize"
    }
}

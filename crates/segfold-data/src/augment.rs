// Augmentation - random transforms for (input, mask) pairs
//
// Geometric augmentations draw one random decision per call and apply it to
// both images. Photometric ones (jitter, noise) only touch the input.

use image::imageops;
use image::{GrayImage, ImageBuffer, Pixel, RgbImage};
use rand::thread_rng;
use rand::Rng;

use crate::transform::PairedTransform;

// PairedHorizontalFlip

/// Randomly flip both images horizontally with probability `p`.
#[derive(Debug, Clone)]
pub struct PairedHorizontalFlip {
    pub p: f64,
}

impl PairedHorizontalFlip {
    pub fn new(p: f64) -> Self {
        Self { p }
    }
}

impl PairedTransform for PairedHorizontalFlip {
    fn apply(&self, input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage) {
        if thread_rng().gen::<f64>() >= self.p {
            return (input, target);
        }
        (
            imageops::flip_horizontal(&input),
            imageops::flip_horizontal(&target),
        )
    }

    fn name(&self) -> &str {
        "PairedHorizontalFlip"
    }
}

// PairedVerticalFlip

/// Randomly flip both images vertically with probability `p`.
#[derive(Debug, Clone)]
pub struct PairedVerticalFlip {
    pub p: f64,
}

impl PairedVerticalFlip {
    pub fn new(p: f64) -> Self {
        Self { p }
    }
}

impl PairedTransform for PairedVerticalFlip {
    fn apply(&self, input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage) {
        if thread_rng().gen::<f64>() >= self.p {
            return (input, target);
        }
        (
            imageops::flip_vertical(&input),
            imageops::flip_vertical(&target),
        )
    }

    fn name(&self) -> &str {
        "PairedVerticalFlip"
    }
}

// PairedRandomCrop

/// Randomly crop both images to `crop_w x crop_h`, optionally zero-padding
/// them by `padding` pixels on every side first.
///
/// The crop offset is drawn from the input's padded size and reused for the
/// mask. Crops larger than the padded image are clamped to it.
#[derive(Debug, Clone)]
pub struct PairedRandomCrop {
    pub crop_h: u32,
    pub crop_w: u32,
    pub padding: u32,
}

impl PairedRandomCrop {
    pub fn new(crop_h: u32, crop_w: u32, padding: u32) -> Self {
        Self {
            crop_h,
            crop_w,
            padding,
        }
    }
}

fn pad<P: Pixel>(
    img: &ImageBuffer<P, Vec<P::Subpixel>>,
    pad: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    if pad == 0 {
        return img.clone();
    }
    let mut padded = ImageBuffer::new(img.width() + 2 * pad, img.height() + 2 * pad);
    imageops::replace(&mut padded, img, pad as i64, pad as i64);
    padded
}

impl PairedTransform for PairedRandomCrop {
    fn apply(&self, input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage) {
        let input = pad(&input, self.padding);
        let target = pad(&target, self.padding);

        let mut rng = thread_rng();
        let max_y = input.height().saturating_sub(self.crop_h);
        let max_x = input.width().saturating_sub(self.crop_w);
        let y0 = if max_y > 0 { rng.gen_range(0..=max_y) } else { 0 };
        let x0 = if max_x > 0 { rng.gen_range(0..=max_x) } else { 0 };

        (
            imageops::crop_imm(&input, x0, y0, self.crop_w, self.crop_h).to_image(),
            imageops::crop_imm(&target, x0, y0, self.crop_w, self.crop_h).to_image(),
        )
    }

    fn name(&self) -> &str {
        "PairedRandomCrop"
    }
}

// GaussianNoise - additive noise on the input

/// Add Gaussian noise `N(0, std_dev)` to every input channel, in 0..=255
/// pixel units. The mask is left untouched.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    pub std_dev: f64,
}

impl GaussianNoise {
    pub fn new(std_dev: f64) -> Self {
        Self { std_dev }
    }
}

impl PairedTransform for GaussianNoise {
    fn apply(&self, mut input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage) {
        use rand_distr::{Distribution, Normal};
        let Ok(normal) = Normal::new(0.0, self.std_dev) else {
            return (input, target);
        };
        let mut rng = thread_rng();
        for v in input.iter_mut() {
            *v = (*v as f64 + normal.sample(&mut rng)).round().clamp(0.0, 255.0) as u8;
        }
        (input, target)
    }

    fn name(&self) -> &str {
        "GaussianNoise"
    }
}

// ColorJitter - random brightness/contrast on the input

/// Randomly adjust brightness and contrast of the input.
///
/// brightness: `x' = x + 255 * uniform(-brightness, +brightness)`
/// contrast:   `x' = mean + (x - mean) * factor` with factor in `[1 - contrast, 1 + contrast]`
#[derive(Debug, Clone)]
pub struct ColorJitter {
    pub brightness: f64,
    pub contrast: f64,
}

impl ColorJitter {
    pub fn new(brightness: f64, contrast: f64) -> Self {
        Self {
            brightness,
            contrast,
        }
    }
}

impl PairedTransform for ColorJitter {
    fn apply(&self, input: RgbImage, target: GrayImage) -> (RgbImage, GrayImage) {
        let mut rng = thread_rng();
        let mut values: Vec<f64> = input.as_raw().iter().map(|&v| v as f64).collect();
        if values.is_empty() {
            return (input, target);
        }

        if self.brightness > 0.0 {
            let delta = 255.0 * rng.gen_range(-self.brightness..self.brightness);
            for v in &mut values {
                *v += delta;
            }
        }

        if self.contrast > 0.0 {
            let factor = rng.gen_range(1.0 - self.contrast..1.0 + self.contrast);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            for v in &mut values {
                *v = mean + (*v - mean) * factor;
            }
        }

        let (w, h) = input.dimensions();
        let raw = values
            .into_iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect();
        match RgbImage::from_raw(w, h, raw) {
            Some(jittered) => (jittered, target),
            None => (input, target),
        }
    }

    fn name(&self) -> &str {
        "ColorJitter"
    }
}

// Tests

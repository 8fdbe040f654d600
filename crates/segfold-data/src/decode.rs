// Image decoding collaborator

use std::path::Path;

use image::DynamicImage;

use crate::error::{DataError, Result};

/// Color layout requested from the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// 3-channel, 8-bit RGB (inputs).
    Rgb,
    /// 1-channel, 8-bit luma (masks).
    Gray,
}

impl ChannelMode {
    pub fn channels(self) -> usize {
        match self {
            ChannelMode::Rgb => 3,
            ChannelMode::Gray => 1,
        }
    }
}

/// Loads an image from storage in the requested channel mode.
///
/// Implementations must be safe to call from several threads at once.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path, mode: ChannelMode) -> Result<DynamicImage>;
}

/// Filesystem loader backed by the `image` crate codecs.
///
/// The format is guessed from the file contents, not the extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path, mode: ChannelMode) -> Result<DynamicImage> {
        let decode_err = |source| DataError::ImageDecode {
            path: path.to_path_buf(),
            source,
        };
        let img = image::ImageReader::open(path)
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)?;

        Ok(match mode {
            ChannelMode::Rgb => DynamicImage::ImageRgb8(img.into_rgb8()),
            ChannelMode::Gray => DynamicImage::ImageLuma8(img.into_luma8()),
        })
    }
}

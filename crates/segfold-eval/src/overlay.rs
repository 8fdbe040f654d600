// Mask overlays for visual inspection

use std::fs;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::imageops;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;

use crate::error::{EvalError, Result};

/// Mask values at or above this count as "on" in [`plain_mask_overlay`].
pub const PLAIN_MASK_THRESHOLD: u8 = 150;

/// Amount added to the green channel under an "on" mask pixel.
pub const PLAIN_MASK_BOOST: u8 = 200;

/// Top-left corner of the AUC label drawn by [`annotate_auc`].
pub const AUC_LABEL_ORIGIN: (i32, i32) = (10, 110);

/// Glyph height of the AUC label, in pixels.
pub const AUC_LABEL_SCALE: f32 = 90.0;

fn check_same_size(image: &RgbImage, mask: &GrayImage) -> Result<()> {
    if image.dimensions() != mask.dimensions() {
        return Err(EvalError::ShapeMismatch {
            expected: image.dimensions(),
            got: mask.dimensions(),
        });
    }
    Ok(())
}

/// Highlight mask pixels `>= 150` by boosting the green channel.
pub fn plain_mask_overlay(image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
    check_same_size(image, mask)?;
    let mut out = image.clone();
    for (px, m) in out.pixels_mut().zip(mask.pixels()) {
        if m.0[0] >= PLAIN_MASK_THRESHOLD {
            px.0[1] = px.0[1].saturating_add(PLAIN_MASK_BOOST);
        }
    }
    Ok(out)
}

/// Winter colormap: blue at 0 fading to green at 255.
pub fn winter(value: u8) -> Rgb<u8> {
    let t = value as f32 / 255.0;
    Rgb([0, (255.0 * t).round() as u8, (255.0 * (1.0 - 0.5 * t)).round() as u8])
}

/// Blend a winter-colormapped mask onto the image as `image + 0.5 * heat`,
/// saturating at white.
///
/// The heat colors are added in RGB order, so low mask values tint the image
/// blue. Heatmaps produced by BGR-ordered tooling put that tint in the red
/// channel instead and will not match these pixel for pixel.
pub fn heatmap_overlay(image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
    check_same_size(image, mask)?;
    let mut out = image.clone();
    for (px, m) in out.pixels_mut().zip(mask.pixels()) {
        let heat = winter(m.0[0]);
        for c in 0..3 {
            let v = px.0[c] as f32 + 0.5 * heat.0[c] as f32;
            px.0[c] = v.round().min(255.0) as u8;
        }
    }
    Ok(out)
}

/// Read a TrueType/OpenType font for [`annotate_auc`].
pub fn load_font(path: &Path) -> Result<FontVec> {
    let data = fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|_| EvalError::Font(path.to_path_buf()))
}

/// Write `auc` with two decimals in white at [`AUC_LABEL_ORIGIN`].
pub fn annotate_auc(image: &mut RgbImage, font: &FontVec, auc: f64) {
    let (x, y) = AUC_LABEL_ORIGIN;
    let label = format!("{auc:.2}");
    draw_text_mut(
        image,
        Rgb([255, 255, 255]),
        x,
        y,
        PxScale::from(AUC_LABEL_SCALE),
        font,
        &label,
    );
}

/// Place `left` and `right` next to each other on a black canvas.
pub fn side_by_side(left: &RgbImage, right: &RgbImage) -> RgbImage {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut canvas = RgbImage::new(width, height);
    imageops::replace(&mut canvas, left, 0, 0);
    imageops::replace(&mut canvas, right, left.width() as i64, 0);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn plain_overlay_thresholds_and_saturates() {
        let image = RgbImage::from_pixel(3, 1, Rgb([10, 100, 10]));
        let mask = GrayImage::from_fn(3, 1, |x, _| Luma([[149, 150, 255][x as usize]]));
        let out = plain_mask_overlay(&image, &mask).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgb([10, 100, 10]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([10, 255, 10]));
        assert_eq!(out.get_pixel(2, 0), &Rgb([10, 255, 10]));

        let dark = RgbImage::from_pixel(1, 1, Rgb([0, 20, 0]));
        let on = GrayImage::from_pixel(1, 1, Luma([200]));
        assert_eq!(plain_mask_overlay(&dark, &on).unwrap().get_pixel(0, 0), &Rgb([0, 220, 0]));
    }

    #[test]
    fn winter_endpoints() {
        assert_eq!(winter(0), Rgb([0, 0, 255]));
        assert_eq!(winter(255), Rgb([0, 255, 128]));
    }

    #[test]
    fn heatmap_blend() {
        let image = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));
        let mask = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
        let out = heatmap_overlay(&image, &mask).unwrap();
        // 0 -> (0, 0, 255) * 0.5 = (0, 0, 127.5)
        assert_eq!(out.get_pixel(0, 0), &Rgb([100, 100, 228]));
        // 255 -> (0, 255, 128) * 0.5 = (0, 127.5, 64)
        assert_eq!(out.get_pixel(1, 0), &Rgb([100, 228, 164]));

        let bright = RgbImage::from_pixel(1, 1, Rgb([250, 250, 250]));
        let out = heatmap_overlay(&bright, &GrayImage::new(1, 1)).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgb([250, 250, 255]));
    }

    #[test]
    fn overlay_size_mismatch() {
        let err = heatmap_overlay(&RgbImage::new(2, 2), &GrayImage::new(2, 3)).unwrap_err();
        assert!(matches!(err, EvalError::ShapeMismatch { .. }));
    }

    fn system_font() -> Option<FontVec> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
        .iter()
        .find_map(|p| load_font(Path::new(p)).ok())
    }

    #[test]
    fn annotate_draws_label_region() {
        let Some(font) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        let before = RgbImage::new(400, 300);
        let mut after = before.clone();
        annotate_auc(&mut after, &font, 0.87);

        let (x0, y0) = AUC_LABEL_ORIGIN;
        let changed = (y0 as u32..y0 as u32 + AUC_LABEL_SCALE as u32)
            .flat_map(|y| (x0 as u32..x0 as u32 + 200).map(move |x| (x, y)))
            .filter(|&(x, y)| after.get_pixel(x, y) != before.get_pixel(x, y))
            .count();
        assert!(changed > 0);
        assert_eq!(after.get_pixel(399, 299), &Rgb([0, 0, 0]));
    }

    #[test]
    fn load_font_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        fs::write(&path, b"not a font").unwrap();
        assert!(matches!(load_font(&path), Err(EvalError::Font(p)) if p == path));
        assert!(matches!(
            load_font(&dir.path().join("missing.ttf")),
            Err(EvalError::Io(_))
        ));
    }

    #[test]
    fn side_by_side_layout() {
        let a = RgbImage::from_pixel(2, 3, Rgb([1, 1, 1]));
        let b = RgbImage::from_pixel(4, 2, Rgb([2, 2, 2]));
        let out = side_by_side(&a, &b);
        assert_eq!(out.dimensions(), (6, 3));
        assert_eq!(out.get_pixel(1, 2), &Rgb([1, 1, 1]));
        assert_eq!(out.get_pixel(2, 0), &Rgb([2, 2, 2]));
        assert_eq!(out.get_pixel(5, 2), &Rgb([0, 0, 0]));
    }
}

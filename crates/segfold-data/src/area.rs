// Mask "area" statistic

use image::GrayImage;

/// Auxiliary area statistic of a mask.
///
/// Sums the row and column indices of every nonzero pixel and divides by the
/// pixel count. This weights pixels by position rather than counting them,
/// so it is not the covered fraction of the mask. Values must stay identical
/// to the ones recorded by earlier training runs.
///
/// An empty (0x0) mask yields `0.0`.
pub fn mask_area(mask: &GrayImage) -> f32 {
    let total = mask.width() as u64 * mask.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let index_sum: u64 = mask
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] != 0)
        .map(|(x, y, _)| x as u64 + y as u64)
        .sum();
    index_sum as f32 / total as f32
}

// ROC curve and AUC
//
// Follows the sklearn conventions so scores stay comparable with numbers
// produced by earlier Python tooling:
//   - thresholds are the distinct scores, in decreasing order
//   - collinear intermediate points are dropped
//   - the curve starts at (0, 0) with threshold +inf
//
// Masks are scored through a 256-bin histogram instead of a sort, which gives
// the same curve for u8 data at a fraction of the cost.

use image::GrayImage;

use crate::error::{EvalError, Result};

/// Mask value treated as the positive class.
pub const MASK_POS_LABEL: u8 = 255;

/// Receiver operating characteristic of a binary scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// False positive rate at each threshold.
    pub fpr: Vec<f64>,
    /// True positive rate at each threshold.
    pub tpr: Vec<f64>,
    /// Decreasing score thresholds; the first one is `+inf`.
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Area under this curve.
    pub fn auc(&self) -> Result<f64> {
        auc(&self.fpr, &self.tpr)
    }
}

/// Compute the ROC curve of `scores` against `y_true`, where samples equal
/// to `pos_label` are positive and everything else negative.
///
/// # Errors
/// `LengthMismatch` if the slices differ in length, `SingleClass` if the
/// ground truth has no positives or no negatives.
pub fn roc_curve(y_true: &[f64], scores: &[f64], pos_label: f64) -> Result<RocCurve> {
    if y_true.len() != scores.len() {
        return Err(EvalError::LengthMismatch {
            labels: y_true.len(),
            scores: scores.len(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut tps = Vec::new();
    let mut fps = Vec::new();
    let mut thresholds = Vec::new();
    let (mut tp, mut fp) = (0.0, 0.0);
    for (k, &i) in order.iter().enumerate() {
        if y_true[i] == pos_label {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        // Emit a point at the last sample of each run of equal scores.
        let last_of_run = order
            .get(k + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if last_of_run {
            tps.push(tp);
            fps.push(fp);
            thresholds.push(scores[i]);
        }
    }

    finish_curve(tps, fps, thresholds)
}

/// ROC curve of a predicted mask against a ground-truth mask, with
/// [`MASK_POS_LABEL`] as the positive class.
pub fn mask_roc_curve(ground_truth: &GrayImage, prediction: &GrayImage) -> Result<RocCurve> {
    if ground_truth.dimensions() != prediction.dimensions() {
        return Err(EvalError::ShapeMismatch {
            expected: ground_truth.dimensions(),
            got: prediction.dimensions(),
        });
    }

    let mut pos = [0u64; 256];
    let mut neg = [0u64; 256];
    for (g, p) in ground_truth.as_raw().iter().zip(prediction.as_raw()) {
        if *g == MASK_POS_LABEL {
            pos[*p as usize] += 1;
        } else {
            neg[*p as usize] += 1;
        }
    }

    let mut tps = Vec::new();
    let mut fps = Vec::new();
    let mut thresholds = Vec::new();
    let (mut tp, mut fp) = (0u64, 0u64);
    for score in (0..256).rev() {
        if pos[score] + neg[score] == 0 {
            continue;
        }
        tp += pos[score];
        fp += neg[score];
        tps.push(tp as f64);
        fps.push(fp as f64);
        thresholds.push(score as f64);
    }

    finish_curve(tps, fps, thresholds)
}

/// Area under the ROC curve of `prediction` against `ground_truth`.
pub fn mask_roc_auc(ground_truth: &GrayImage, prediction: &GrayImage) -> Result<f64> {
    mask_roc_curve(ground_truth, prediction)?.auc()
}

/// Drop collinear points, prepend the origin and normalise the counts.
fn finish_curve(tps: Vec<f64>, fps: Vec<f64>, thresholds: Vec<f64>) -> Result<RocCurve> {
    let positives = tps.last().copied().unwrap_or(0.0);
    let negatives = fps.last().copied().unwrap_or(0.0);
    if positives <= 0.0 || negatives <= 0.0 {
        return Err(EvalError::SingleClass {
            positives: positives as usize,
            negatives: negatives as usize,
        });
    }

    let n = tps.len();
    let keep: Vec<usize> = if n > 2 {
        (0..n)
            .filter(|&i| {
                i == 0
                    || i == n - 1
                    || fps[i + 1] - 2.0 * fps[i] + fps[i - 1] != 0.0
                    || tps[i + 1] - 2.0 * tps[i] + tps[i - 1] != 0.0
            })
            .collect()
    } else {
        (0..n).collect()
    };

    let mut curve = RocCurve {
        fpr: Vec::with_capacity(keep.len() + 1),
        tpr: Vec::with_capacity(keep.len() + 1),
        thresholds: Vec::with_capacity(keep.len() + 1),
    };
    curve.fpr.push(0.0);
    curve.tpr.push(0.0);
    curve.thresholds.push(f64::INFINITY);
    for i in keep {
        curve.fpr.push(fps[i] / negatives);
        curve.tpr.push(tps[i] / positives);
        curve.thresholds.push(thresholds[i]);
    }
    Ok(curve)
}

/// Area under a curve with the trapezoidal rule.
///
/// `x` must be monotonic, either increasing or decreasing.
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(EvalError::LengthMismatch {
            labels: x.len(),
            scores: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(EvalError::TooFewPoints(x.len()));
    }

    let mut direction = 1.0;
    if x.windows(2).any(|w| w[1] < w[0]) {
        if x.windows(2).all(|w| w[1] <= w[0]) {
            direction = -1.0;
        } else {
            return Err(EvalError::NotMonotonic);
        }
    }

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum();
    Ok(direction * area)
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_roc_curve_textbook() {
        // Same case as the sklearn docs.
        let y = [1.0, 1.0, 2.0, 2.0];
        let scores = [0.1, 0.4, 0.35, 0.8];
        let roc = roc_curve(&y, &scores, 2.0).unwrap();
        assert_eq!(roc.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert_eq!(roc.thresholds[0], f64::INFINITY);
        assert_eq!(&roc.thresholds[1..], &[0.8, 0.4, 0.35, 0.1]);
        assert!(close(roc.auc().unwrap(), 0.75));
    }

    #[test]
    fn test_perfect_and_inverted_scores() {
        let y = [0.0, 0.0, 1.0, 1.0];
        let good = roc_curve(&y, &[0.1, 0.2, 0.8, 0.9], 1.0).unwrap();
        assert!(close(good.auc().unwrap(), 1.0));
        let bad = roc_curve(&y, &[0.9, 0.8, 0.2, 0.1], 1.0).unwrap();
        assert!(close(bad.auc().unwrap(), 0.0));
    }

    #[test]
    fn test_ties_give_half() {
        let y = [0.0, 1.0, 0.0, 1.0];
        let roc = roc_curve(&y, &[0.5; 4], 1.0).unwrap();
        assert_eq!(roc.fpr, vec![0.0, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 1.0]);
        assert!(close(roc.auc().unwrap(), 0.5));
    }

    #[test]
    fn test_collinear_points_dropped() {
        // Three positives with distinct scores then three negatives: the
        // middle points on each straight segment are removed.
        let y = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let s = [6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let roc = roc_curve(&y, &s, 1.0).unwrap();
        assert_eq!(roc.fpr, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 1.0 / 3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_single_class_is_error() {
        let err = roc_curve(&[1.0, 1.0], &[0.2, 0.3], 1.0).unwrap_err();
        assert!(matches!(
            err,
            EvalError::SingleClass {
                positives: 2,
                negatives: 0
            }
        ));
        assert!(roc_curve(&[0.0, 0.0], &[0.2, 0.3], 1.0).is_err());
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            roc_curve(&[1.0], &[0.2, 0.3], 1.0),
            Err(EvalError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_auc_trapezoid() {
        assert!(close(auc(&[0.0, 1.0], &[0.0, 1.0]).unwrap(), 0.5));
        assert!(close(auc(&[0.0, 0.5, 1.0], &[1.0, 1.0, 1.0]).unwrap(), 1.0));
        // Decreasing x is accepted.
        assert!(close(auc(&[1.0, 0.0], &[1.0, 0.0]).unwrap(), 0.5));
    }

    #[test]
    fn test_auc_errors() {
        assert!(matches!(auc(&[0.0], &[1.0]), Err(EvalError::TooFewPoints(1))));
        assert!(matches!(
            auc(&[0.0, 1.0, 0.5], &[0.0, 1.0, 1.0]),
            Err(EvalError::NotMonotonic)
        ));
    }

    #[test]
    fn test_mask_curve_matches_generic_curve() {
        let gt = GrayImage::from_fn(8, 8, |x, y| {
            Luma([if (x + y) % 3 == 0 { MASK_POS_LABEL } else { 0 }])
        });
        let pred = GrayImage::from_fn(8, 8, |x, y| Luma([((x * 37 + y * 11) % 256) as u8]));

        let y: Vec<f64> = gt.as_raw().iter().map(|&v| v as f64).collect();
        let s: Vec<f64> = pred.as_raw().iter().map(|&v| v as f64).collect();
        let generic = roc_curve(&y, &s, 255.0).unwrap();
        let fast = mask_roc_curve(&gt, &pred).unwrap();
        assert_eq!(generic, fast);
    }

    #[test]
    fn test_mask_auc_perfect() {
        let gt = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 255 } else { 0 }]));
        assert!(close(mask_roc_auc(&gt, &gt).unwrap(), 1.0));
    }

    #[test]
    fn test_mask_gray_levels_are_negative() {
        // Only exactly 255 counts as positive ground truth.
        let gt = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 255 } else { 254 }]));
        let pred = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 200 } else { 10 }]));
        assert!(close(mask_roc_auc(&gt, &pred).unwrap(), 1.0));
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let err = mask_roc_auc(&GrayImage::new(2, 2), &GrayImage::new(3, 2)).unwrap_err();
        assert!(matches!(err, EvalError::ShapeMismatch { .. }));
    }
}

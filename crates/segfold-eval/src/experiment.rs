// Experiment directories - batch scoring and visualization
//
// An experiment root holds the inputs, the ground truth and one directory of
// predictions per model run:
//
//   root/
//     A/            input images            (a.png, b.png, ...)
//     B/            ground-truth masks      (same file names)
//     res/<name>/   predicted masks         (same file names)
//
// Outputs go to `root/vis/<name>/` (input next to the overlaid prediction)
// and `root/vis_all/<name>/` (heatmaps, numbered in evaluation order).

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{EvalError, Result};
use crate::overlay::{
    annotate_auc, heatmap_overlay, load_font, plain_mask_overlay, side_by_side,
};
use crate::roc::mask_roc_auc;

/// Side length images are resized to by [`Experiment::visualize_all`].
pub const DEFAULT_VIS_SIZE: u32 = 1500;

/// Options shared by the batch operations.
#[derive(Debug, Clone, Default)]
pub struct EvalConfig {
    /// Restrict to these file stems (name without `.png`); empty means all.
    pub only: Vec<String>,
    /// Score files on the rayon pool instead of one after another.
    pub parallel: bool,
    /// Font used to print the AUC on `vis_all` heatmaps; unlabelled if unset.
    pub font: Option<PathBuf>,
}

impl EvalConfig {
    pub fn only<I, S>(mut self, stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = stems.into_iter().map(Into::into).collect();
        self
    }

    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    pub fn font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = Some(path.into());
        self
    }
}

/// Files sharing one name across the input, ground-truth and prediction
/// directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionPair {
    pub file_name: String,
    pub image: PathBuf,
    pub ground_truth: PathBuf,
    pub prediction: PathBuf,
}

/// AUC of one prediction file. `auc` is NaN when the ground truth holds a
/// single class.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAuc {
    pub file_name: String,
    pub auc: f64,
}

/// Mean of the finite AUCs in `results`, `None` if there are none.
pub fn mean_auc(results: &[FileAuc]) -> Option<f64> {
    let finite: Vec<f64> = results.iter().map(|r| r.auc).filter(|a| a.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// One model run inside an experiment root.
#[derive(Debug, Clone)]
pub struct Experiment {
    root: PathBuf,
    name: String,
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| EvalError::Image {
        path: path.to_path_buf(),
        source,
    })
}

fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|source| EvalError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// ROC-AUC of one file, NaN when the ground truth holds a single class so the
/// rest of the batch still gets scored.
fn score_file(file_name: &str, gt: &GrayImage, pred: &GrayImage) -> Result<f64> {
    match mask_roc_auc(gt, pred) {
        Ok(auc) => Ok(auc),
        Err(EvalError::SingleClass {
            positives,
            negatives,
        }) => {
            warn!(
                file = %file_name,
                positives,
                negatives,
                "single-class ground truth, AUC undefined"
            );
            Ok(f64::NAN)
        }
        Err(e) => Err(e),
    }
}

/// Run `f` over `items` with their position, in parallel when asked.
fn map_items<T, R, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> Result<R> + Sync + Send,
{
    if parallel {
        items.par_iter().enumerate().map(|(i, t)| f(i, t)).collect()
    } else {
        items.iter().enumerate().map(|(i, t)| f(i, t)).collect()
    }
}

impl Experiment {
    pub fn new<P: AsRef<Path>>(root: P, name: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            name: name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("A")
    }

    pub fn ground_truth_dir(&self) -> PathBuf {
        self.root.join("B")
    }

    pub fn predictions_dir(&self) -> PathBuf {
        self.root.join("res").join(&self.name)
    }

    pub fn vis_dir(&self) -> PathBuf {
        self.root.join("vis").join(&self.name)
    }

    pub fn vis_all_dir(&self) -> PathBuf {
        self.root.join("vis_all").join(&self.name)
    }

    /// List `.png` predictions (recursively, sorted by name) and pair each
    /// with the same file name under `A/` and `B/`.
    ///
    /// Counterparts are not checked here; a missing one fails when read.
    pub fn collect_pairs(&self, only: &[String]) -> Result<Vec<PredictionPair>> {
        let pred_dir = self.predictions_dir();
        if !pred_dir.is_dir() {
            return Err(EvalError::MissingDirectory(pred_dir));
        }

        let mut pairs = Vec::new();
        for entry in WalkDir::new(&pred_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = file_name.strip_suffix(".png") else {
                continue;
            };
            if !only.is_empty() && !only.iter().any(|s| s == stem) {
                continue;
            }
            pairs.push(PredictionPair {
                image: self.images_dir().join(&file_name),
                ground_truth: self.ground_truth_dir().join(&file_name),
                prediction: entry.path().to_path_buf(),
                file_name,
            });
        }
        debug!(experiment = %self.name, count = pairs.len(), "collected prediction files");
        Ok(pairs)
    }

    /// ROC-AUC of every prediction against its ground truth, at native
    /// resolution.
    pub fn evaluate_auc(&self, config: &EvalConfig) -> Result<Vec<FileAuc>> {
        let pairs = self.collect_pairs(&config.only)?;
        map_items(&pairs, config.parallel, |_, pair| {
            let gt = open_image(&pair.ground_truth)?.into_luma8();
            let pred = open_image(&pair.prediction)?.into_luma8();
            let auc = score_file(&pair.file_name, &gt, &pred)?;
            info!(file = %pair.file_name, auc, "scored prediction");
            Ok(FileAuc {
                file_name: pair.file_name.clone(),
                auc,
            })
        })
    }

    /// Write `vis/<name>/<file>`: the input image next to the input with the
    /// prediction overlaid. Returns the number of files written.
    pub fn visualize_pairs(&self, config: &EvalConfig) -> Result<usize> {
        let pairs = self.collect_pairs(&config.only)?;
        let out_dir = self.vis_dir();
        fs::create_dir_all(&out_dir)?;

        let written = map_items(&pairs, config.parallel, |_, pair| {
            let image = open_image(&pair.image)?.into_rgb8();
            let mask = open_image(&pair.prediction)?.into_luma8();
            let overlay = plain_mask_overlay(&image, &mask)?;
            save_image(&side_by_side(&image, &overlay), &out_dir.join(&pair.file_name))
        })?;
        info!(
            experiment = %self.name,
            files = written.len(),
            dir = %out_dir.display(),
            "wrote overlays"
        );
        Ok(written.len())
    }

    /// Resize input, ground truth and prediction to `size x size`, score the
    /// prediction, and write its heatmap overlay to
    /// `vis_all/<name>/<index>.png`, labelled with the AUC when
    /// [`EvalConfig::font`] is set. Returns the scores in file order.
    pub fn visualize_all(&self, config: &EvalConfig, size: u32) -> Result<Vec<FileAuc>> {
        let pairs = self.collect_pairs(&config.only)?;
        let out_dir = self.vis_all_dir();
        fs::create_dir_all(&out_dir)?;

        let font = match &config.font {
            Some(path) => Some(load_font(path)?),
            None => {
                debug!("no font configured, heatmaps are written without AUC labels");
                None
            }
        };

        map_items(&pairs, config.parallel, |index, pair| {
            let image: RgbImage = imageops::resize(
                &open_image(&pair.image)?.into_rgb8(),
                size,
                size,
                FilterType::Triangle,
            );
            let gt: GrayImage = imageops::resize(
                &open_image(&pair.ground_truth)?.into_luma8(),
                size,
                size,
                FilterType::Triangle,
            );
            let pred: GrayImage = imageops::resize(
                &open_image(&pair.prediction)?.into_luma8(),
                size,
                size,
                FilterType::Triangle,
            );

            let auc = score_file(&pair.file_name, &gt, &pred)?;
            let mut heat = heatmap_overlay(&image, &pred)?;
            if let Some(font) = &font {
                annotate_auc(&mut heat, font, auc);
            }
            save_image(&heat, &out_dir.join(format!("{index}.png")))?;
            info!(file = %pair.file_name, auc, "scored prediction");
            Ok(FileAuc {
                file_name: pair.file_name.clone(),
                auc,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let e = Experiment::new("/data/run", "unet");
        assert_eq!(e.images_dir(), PathBuf::from("/data/run/A"));
        assert_eq!(e.ground_truth_dir(), PathBuf::from("/data/run/B"));
        assert_eq!(e.predictions_dir(), PathBuf::from("/data/run/res/unet"));
        assert_eq!(e.vis_dir(), PathBuf::from("/data/run/vis/unet"));
        assert_eq!(e.vis_all_dir(), PathBuf::from("/data/run/vis_all/unet"));
    }

    #[test]
    fn mean_of_scores() {
        assert_eq!(mean_auc(&[]), None);
        let r = [
            FileAuc {
                file_name: "a.png".into(),
                auc: 0.5,
            },
            FileAuc {
                file_name: "b.png".into(),
                auc: 1.0,
            },
        ];
        assert_eq!(mean_auc(&r), Some(0.75));

        let with_nan = [
            r[0].clone(),
            FileAuc {
                file_name: "c.png".into(),
                auc: f64::NAN,
            },
        ];
        assert_eq!(mean_auc(&with_nan), Some(0.5));
        assert_eq!(mean_auc(&with_nan[1..]), None);
    }

    #[test]
    fn missing_predictions_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = Experiment::new(dir.path(), "nope")
            .collect_pairs(&[])
            .unwrap_err();
        assert!(matches!(err, EvalError::MissingDirectory(_)));
    }
}

// SegmentationFolder - directory-based image/mask dataset
//
// Discovers samples under a root directory laid out as:
//
//   root/
//     background/
//       a.png              -> label 0, blank mask
//     x/
//       b.png              -> label 1, mask at y/b.png
//       True/
//         c.png            -> label 2, mask at y/True/c.png
//     y/
//       b.png
//       True/
//         c.png
//
// The index is built once by the builder and never changes afterwards.
// `get` decodes the files on every call; caching and batching belong to
// whatever loader drives the dataset.
//
// USAGE:
//
//   let ds = SegmentationFolder::builder("data/train")
//       .patch_size(256)
//       .transform(PairedHorizontalFlip::new(0.5))
//       .build()?;
//   let (input, target, area, label) = ds.get(0)?.into_parts();

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::GrayImage;
use tracing::{debug, info};

use crate::area::mask_area;
use crate::classify::{Classifier, DirectoryMarkerClassifier};
use crate::dataset::{Dataset, SegmentationSample};
use crate::decode::{ChannelMode, FsImageLoader, ImageLoader};
use crate::discover::{default_extensions, discover};
use crate::error::{DataError, Result};
use crate::record::{SampleRecord, TargetPath};
use crate::transform::PairedTransform;

/// Side length of the blank mask synthesized for background samples.
pub const DEFAULT_PATCH_SIZE: u32 = 256;

// SegmentationFolderBuilder

/// Builder for [`SegmentationFolder`].
pub struct SegmentationFolderBuilder {
    root: PathBuf,
    patch_size: u32,
    extensions: Vec<String>,
    classifier: Arc<dyn Classifier>,
    loader: Arc<dyn ImageLoader>,
    transform: Option<Arc<dyn PairedTransform>>,
    sort: bool,
}

impl SegmentationFolderBuilder {
    /// Create a builder rooted at the given directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        SegmentationFolderBuilder {
            root: root.as_ref().to_path_buf(),
            patch_size: DEFAULT_PATCH_SIZE,
            extensions: default_extensions(),
            classifier: Arc::new(DirectoryMarkerClassifier::default()),
            loader: Arc::new(FsImageLoader),
            transform: None,
            sort: true,
        }
    }

    /// Size of the blank mask returned for background samples.
    pub fn patch_size(mut self, size: u32) -> Self {
        self.patch_size = size;
        self
    }

    /// Replace the accepted file suffixes (matched case-insensitively).
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn classifier<C: Classifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn loader<L: ImageLoader + 'static>(mut self, loader: L) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Paired transform applied to every sample after loading.
    pub fn transform<T: PairedTransform + 'static>(mut self, transform: T) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Visit directory entries sorted by name (default) instead of in
    /// listing order.
    pub fn sort(mut self, yes: bool) -> Self {
        self.sort = yes;
        self
    }

    /// Scan the directory tree and build the dataset.
    pub fn build(self) -> Result<SegmentationFolder> {
        if self.patch_size == 0 {
            return Err(DataError::config("patch size must be positive"));
        }
        if self.extensions.is_empty() {
            return Err(DataError::config("at least one file extension is required"));
        }

        let records = discover(
            &self.root,
            &self.extensions,
            self.classifier.as_ref(),
            self.sort,
        )?;

        let ds = SegmentationFolder {
            root: self.root,
            records: Arc::from(records),
            patch_size: self.patch_size,
            extensions: self.extensions,
            loader: self.loader,
            transform: self.transform,
        };
        info!(
            root = %ds.root.display(),
            samples = ds.len(),
            counts = ?ds.label_counts(),
            "indexed segmentation dataset"
        );
        Ok(ds)
    }
}

// SegmentationFolder dataset

/// Image/mask dataset discovered from a directory tree.
///
/// Cloning is cheap: the record list, loader and transform are shared.
#[derive(Clone)]
pub struct SegmentationFolder {
    root: PathBuf,
    records: Arc<[SampleRecord]>,
    patch_size: u32,
    extensions: Vec<String>,
    loader: Arc<dyn ImageLoader>,
    transform: Option<Arc<dyn PairedTransform>>,
}

impl SegmentationFolder {
    /// Convenience entry-point: `SegmentationFolder::builder(root)`.
    pub fn builder<P: AsRef<Path>>(root: P) -> SegmentationFolderBuilder {
        SegmentationFolderBuilder::new(root)
    }

    /// Build with every default: 256px blank masks, standard image suffixes,
    /// directory-marker classification, no transform.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        SegmentationFolderBuilder::new(root).build()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// All records, in discovery order.
    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Result<&SampleRecord> {
        self.records.get(index).ok_or(DataError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    /// Label of every record, in discovery order.
    pub fn labels(&self) -> Vec<u8> {
        self.records.iter().map(SampleRecord::label).collect()
    }

    /// Number of records per label.
    pub fn label_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for r in self.records.iter() {
            *counts.entry(r.label()).or_insert(0) += 1;
        }
        counts
    }

    /// Load the sample at `index`.
    ///
    /// Background records get an all-zero `patch_size x patch_size` mask and
    /// an area of `0.0`. Other records load their mask in gray mode and
    /// derive the area from it. With a transform configured, the pair is
    /// transformed jointly and the area of non-background samples is
    /// recomputed from the transformed mask.
    pub fn load(&self, index: usize) -> Result<SegmentationSample> {
        let record = self.record(index)?;
        debug!(index, path = %record.input_path.display(), "loading sample");

        let input = self
            .loader
            .load(&record.input_path, ChannelMode::Rgb)?
            .into_rgb8();

        let (target, mut area) = match &record.target {
            TargetPath::Empty => (GrayImage::new(self.patch_size, self.patch_size), 0.0),
            TargetPath::Path(path) => {
                let target = self.loader.load(path, ChannelMode::Gray)?.into_luma8();
                let area = mask_area(&target);
                (target, area)
            }
        };

        let label = record.label();
        let (input, target) = match &self.transform {
            Some(t) => {
                let (input, target) = t.apply(input, target);
                if label != 0 {
                    area = mask_area(&target);
                }
                (input, target)
            }
            None => (input, target),
        };

        Ok(SegmentationSample {
            input,
            target,
            area,
            label,
        })
    }
}

impl Dataset for SegmentationFolder {
    type Item = SegmentationSample;

    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, index: usize) -> Result<SegmentationSample> {
        self.load(index)
    }

    fn name(&self) -> &str {
        "SegmentationFolder"
    }
}

impl fmt::Debug for SegmentationFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentationFolder")
            .field("root", &self.root)
            .field("records", &self.records.len())
            .field("patch_size", &self.patch_size)
            .field("extensions", &self.extensions)
            .field("transform", &self.transform.as_ref().map(|t| t.name()))
            .finish()
    }
}

impl fmt::Display for SegmentationFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset {}", self.name())?;
        writeln!(f, "    Number of datapoints: {}", self.len())?;
        writeln!(f, "    Root Location: {}", self.root.display())?;
        let transform = self.transform.as_ref().map_or("None", |t| t.name());
        writeln!(f, "    Transforms (if any): {transform}")
    }
}

// Classifier - maps a dataset-relative path to a sample category
//
// The default policy reads directory names:
//
//   root/
//     background/...        -> Background (no mask)
//     x/True/img.png        -> Positive { true_label: true },  mask at y/True/img.png
//     x/img.png             -> Positive { true_label: false }, mask at y/img.png
//
// Marker strings are matched as substrings of directory segments, so
// `train_x/` counts as a positive directory too. Any other policy can be
// plugged in through the `Classifier` trait.

use std::path::{Component, Path, PathBuf};

use crate::record::SampleClass;

/// Strategy deciding which files are samples and where their masks live.
///
/// Both methods receive the file path relative to the dataset root.
pub trait Classifier: Send + Sync {
    /// Category of the file, or `None` if it is not a sample.
    fn classify(&self, relative: &Path) -> Option<SampleClass>;

    /// Relative path of the companion mask of a positive sample.
    fn companion(&self, relative: &Path) -> PathBuf;

    fn name(&self) -> &str {
        "classifier"
    }
}

/// Directory-marker classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryMarkerClassifier {
    /// Marks background directories.
    pub background: String,
    /// Marks input directories of positive samples.
    pub input: String,
    /// Replaces the first `input` marker to locate the mask.
    pub target: String,
    /// Marks the verified positive subset.
    pub verified: String,
}

impl Default for DirectoryMarkerClassifier {
    fn default() -> Self {
        Self {
            background: "background".to_string(),
            input: "x".to_string(),
            target: "y".to_string(),
            verified: "True".to_string(),
        }
    }
}

impl DirectoryMarkerClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, marker: impl Into<String>) -> Self {
        self.background = marker.into();
        self
    }

    pub fn input(mut self, marker: impl Into<String>) -> Self {
        self.input = marker.into();
        self
    }

    pub fn target(mut self, marker: impl Into<String>) -> Self {
        self.target = marker.into();
        self
    }

    pub fn verified(mut self, marker: impl Into<String>) -> Self {
        self.verified = marker.into();
        self
    }
}

/// Directory segments of a relative file path (file name excluded).
fn dir_segments(relative: &Path) -> Vec<String> {
    relative
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

impl Classifier for DirectoryMarkerClassifier {
    fn classify(&self, relative: &Path) -> Option<SampleClass> {
        let segments = dir_segments(relative);
        if segments.iter().any(|s| s.contains(&self.background)) {
            return Some(SampleClass::Background);
        }
        if segments.iter().any(|s| s.contains(&self.input)) {
            let true_label = segments.iter().any(|s| s.contains(&self.verified));
            return Some(SampleClass::Positive { true_label });
        }
        None
    }

    fn companion(&self, relative: &Path) -> PathBuf {
        let text = relative.to_string_lossy();
        PathBuf::from(text.replacen(&self.input, &self.target, 1))
    }

    fn name(&self) -> &str {
        "DirectoryMarkerClassifier"
    }
}

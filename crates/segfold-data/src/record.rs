// Sample records produced by discovery

use std::fmt;
use std::path::{Path, PathBuf};

/// Category of a discovered sample.
///
/// `Background` samples carry no mask. `Positive` samples have a companion
/// mask; `true_label` marks the ones that come from a verified ("True")
/// subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleClass {
    Background,
    Positive { true_label: bool },
}

impl SampleClass {
    /// Integer label handed to the training loop: 0, 1 or 2.
    pub fn label(self) -> u8 {
        match self {
            SampleClass::Background => 0,
            SampleClass::Positive { true_label: false } => 1,
            SampleClass::Positive { true_label: true } => 2,
        }
    }

    /// Inverse of [`label`](Self::label).
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(SampleClass::Background),
            1 => Some(SampleClass::Positive { true_label: false }),
            2 => Some(SampleClass::Positive { true_label: true }),
            _ => None,
        }
    }
}

/// Where the target mask of a sample comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetPath {
    /// No mask file; a blank `patch_size x patch_size` mask is synthesized.
    Empty,
    /// Companion mask on disk.
    Path(PathBuf),
}

impl TargetPath {
    pub fn is_empty(&self) -> bool {
        matches!(self, TargetPath::Empty)
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TargetPath::Empty => None,
            TargetPath::Path(p) => Some(p),
        }
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPath::Empty => write!(f, "empty"),
            TargetPath::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// One discovered (input, target, label) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    pub input_path: PathBuf,
    pub target: TargetPath,
    pub class: SampleClass,
}

impl SampleRecord {
    pub fn label(&self) -> u8 {
        self.class.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for label in 0..3u8 {
            let class = SampleClass::from_label(label).unwrap();
            assert_eq!(class.label(), label);
        }
        assert_eq!(SampleClass::from_label(3), None);
    }

    #[test]
    fn empty_target_display() {
        assert_eq!(TargetPath::Empty.to_string(), "empty");
        assert!(TargetPath::Empty.as_path().is_none());
        let t = TargetPath::Path(PathBuf::from("data/y/a.png"));
        assert!(!t.is_empty());
        assert_eq!(t.as_path(), Some(Path::new("data/y/a.png")));
    }
}

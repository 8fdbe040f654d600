// Discovery - walk a dataset root once and build the sample index

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::classify::Classifier;
use crate::error::{DataError, Result};
use crate::record::{SampleClass, SampleRecord, TargetPath};

/// Default image suffixes (matched case-insensitively against file names).
pub const IMG_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".ppm", ".bmp", ".pgm", ".tif", ".tiff", ".webp",
];

/// Owned copy of [`IMG_EXTENSIONS`].
pub fn default_extensions() -> Vec<String> {
    IMG_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Whether `file_name` ends with one of `extensions`, ignoring case.
pub fn has_allowed_extension(file_name: &str, extensions: &[String]) -> bool {
    let lower = file_name.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_lowercase()))
}

/// Walk `root` recursively and classify every file with an allowed suffix.
///
/// Records come back in traversal order. With `sort` set, entries of each
/// directory are visited by file name, which makes the order reproducible
/// across filesystems; otherwise directory-listing order is used.
///
/// Positive samples get their mask path from [`Classifier::companion`],
/// resolved against `root`. Mask existence is not checked here; a missing
/// mask surfaces when the sample is read.
///
/// # Errors
/// `NotADirectory` if `root` is not a directory, `Walk` if traversal fails,
/// `NoSamples` if nothing qualified.
pub fn discover(
    root: &Path,
    extensions: &[String],
    classifier: &dyn Classifier,
    sort: bool,
) -> Result<Vec<SampleRecord>> {
    if !root.is_dir() {
        return Err(DataError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).min_depth(1).follow_links(true);
    if sort {
        walker = walker.sort_by_file_name();
    }

    let mut records = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !has_allowed_extension(&name, extensions) {
            continue;
        }

        let path = entry.path();
        let relative = match path.strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let Some(class) = classifier.classify(relative) else {
            continue;
        };

        let target = match class {
            SampleClass::Background => TargetPath::Empty,
            SampleClass::Positive { .. } => {
                TargetPath::Path(root.join(classifier.companion(relative)))
            }
        };
        debug!(path = %path.display(), label = class.label(), "discovered sample");
        records.push(SampleRecord {
            input_path: path.to_path_buf(),
            target,
            class,
        });
    }

    if records.is_empty() {
        return Err(DataError::NoSamples {
            root: root.to_path_buf(),
            extensions: extensions.to_vec(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_ignores_case() {
        let exts = default_extensions();
        assert!(has_allowed_extension("a.PNG", &exts));
        assert!(has_allowed_extension("scan.TiFf", &exts));
        assert!(has_allowed_extension("b.webp", &exts));
        assert!(!has_allowed_extension("notes.txt", &exts));
        assert!(!has_allowed_extension("png", &exts));
    }

    #[test]
    fn custom_extension_list() {
        let exts = vec![".PGM".to_string()];
        assert!(has_allowed_extension("mask.pgm", &exts));
        assert!(!has_allowed_extension("mask.png", &exts));
    }
}

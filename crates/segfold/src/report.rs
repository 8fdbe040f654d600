use std::fmt::Write;

use segfold_data::{SampleRecord, SegmentationFolder, SegmentationSample};
use segfold_eval::{mean_auc, FileAuc};

fn label_name(label: u8) -> &'static str {
    match label {
        0 => "background",
        1 => "positive",
        2 => "positive (verified)",
        _ => "unknown",
    }
}

/// Dataset header followed by per-label counts and, optionally, every record.
pub fn dataset_report(ds: &SegmentationFolder, list: bool) -> String {
    let mut out = ds.to_string();
    for (label, count) in ds.label_counts() {
        let _ = writeln!(
            out,
            "    label {label} ({}): {count}",
            label_name(label)
        );
    }
    if list {
        for (i, r) in ds.records().iter().enumerate() {
            let _ = writeln!(
                out,
                "{i:>6}  {}  {}  {}",
                r.label(),
                r.input_path.display(),
                r.target
            );
        }
    }
    out
}

/// Description of one loaded sample.
pub fn sample_report(index: usize, record: &SampleRecord, sample: &SegmentationSample) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "sample {index}");
    let _ = writeln!(
        out,
        "    input:  {} ({}x{})",
        record.input_path.display(),
        sample.input.width(),
        sample.input.height()
    );
    let _ = writeln!(
        out,
        "    target: {} ({}x{})",
        record.target,
        sample.target.width(),
        sample.target.height()
    );
    let _ = writeln!(out, "    label:  {} ({})", sample.label, label_name(sample.label));
    let _ = writeln!(out, "    area:   {:.6}", sample.area);
    out
}

/// One line per file plus the mean of the defined scores. Undefined
/// (single-class) scores print as `NaN`.
pub fn auc_table(results: &[FileAuc]) -> String {
    let width = results
        .iter()
        .map(|r| r.file_name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>8}", "file", "auc");
    for r in results {
        let _ = writeln!(out, "{:<width$}  {:>8.4}", r.file_name, r.auc);
    }
    match mean_auc(results) {
        Some(mean) => {
            let _ = writeln!(out, "{:<width$}  {:>8.4}", "mean", mean);
        }
        None => {
            let _ = writeln!(out, "no prediction files");
        }
    }
    out
}

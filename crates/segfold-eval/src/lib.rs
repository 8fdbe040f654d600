//! # segfold-eval
//!
//! Scoring and visual inspection of predicted segmentation masks.
//!
//! This crate provides:
//! - [`roc_curve`] / [`auc`]: binary ROC analysis with sklearn conventions
//! - [`mask_roc_auc`]: ROC-AUC of a predicted mask against ground truth
//! - [`plain_mask_overlay`] / [`heatmap_overlay`] / [`annotate_auc`]: mask visualizations
//! - [`Experiment`]: batch scoring and overlay export over an experiment root

pub mod error;
pub mod experiment;
pub mod overlay;
pub mod roc;

pub use error::{EvalError, Result};
pub use experiment::{
    mean_auc, EvalConfig, Experiment, FileAuc, PredictionPair, DEFAULT_VIS_SIZE,
};
pub use overlay::{
    annotate_auc, heatmap_overlay, load_font, plain_mask_overlay, side_by_side, winter,
};
pub use roc::{auc, mask_roc_auc, mask_roc_curve, roc_curve, RocCurve, MASK_POS_LABEL};

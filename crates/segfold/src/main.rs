//! segfold CLI
//!
//! ```bash
//! segfold index data/train --list
//! segfold inspect data/train 12 --save-dir /tmp/sample
//! segfold auc experiments/run1 unet --only img_001 --only img_002
//! segfold vis experiments/run1 unet
//! segfold vis-all experiments/run1 unet --size 1500 --font DejaVuSans.ttf
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use segfold::data::{Dataset, SegmentationFolder, DEFAULT_PATCH_SIZE};
use segfold::eval::{EvalConfig, Experiment, DEFAULT_VIS_SIZE};
use segfold::report;

#[derive(Parser)]
#[command(name = "segfold")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Segmentation dataset indexing, inspection and ROC-AUC evaluation")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options for building a dataset.
#[derive(Args)]
struct DatasetArgs {
    /// Dataset root directory
    root: PathBuf,

    /// Side length of the blank mask used for background samples
    #[arg(long, default_value_t = DEFAULT_PATCH_SIZE, env = "SEGFOLD_PATCH_SIZE")]
    patch_size: u32,

    /// Keep directory-listing order instead of sorting entries by name
    #[arg(long)]
    no_sort: bool,
}

impl DatasetArgs {
    fn build(&self) -> anyhow::Result<SegmentationFolder> {
        SegmentationFolder::builder(&self.root)
            .patch_size(self.patch_size)
            .sort(!self.no_sort)
            .build()
            .with_context(|| format!("failed to index {}", self.root.display()))
    }
}

/// Options selecting an experiment run.
#[derive(Args)]
struct ExperimentArgs {
    /// Experiment root containing A/, B/ and res/<name>/
    root: PathBuf,

    /// Prediction run name under res/
    name: String,

    /// Only process these file stems (repeatable)
    #[arg(long)]
    only: Vec<String>,

    /// Process files on all cores
    #[arg(long)]
    parallel: bool,
}

impl ExperimentArgs {
    fn split(self) -> (Experiment, EvalConfig) {
        let config = EvalConfig::default().only(self.only).parallel(self.parallel);
        (Experiment::new(self.root, self.name), config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Discover samples and print a summary
    Index {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Print every record
        #[arg(long)]
        list: bool,
    },
    /// Load one sample and describe it
    Inspect {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Sample index
        index: usize,

        /// Write input.png and target.png for the sample here
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
    /// Score every prediction of a run with ROC-AUC
    Auc {
        #[command(flatten)]
        experiment: ExperimentArgs,
    },
    /// Write input | overlay composites to vis/<name>/
    Vis {
        #[command(flatten)]
        experiment: ExperimentArgs,
    },
    /// Resize, score and write heatmaps to vis_all/<name>/
    VisAll {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Side length images are resized to before scoring
        #[arg(long, default_value_t = DEFAULT_VIS_SIZE)]
        size: u32,

        /// TrueType font used to print the AUC on each heatmap
        #[arg(long, env = "SEGFOLD_FONT")]
        font: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    segfold::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index { dataset, list } => {
            let ds = dataset.build()?;
            print!("{}", report::dataset_report(&ds, list));
        }
        Commands::Inspect {
            dataset,
            index,
            save_dir,
        } => {
            let ds = dataset.build()?;
            let record = ds.record(index)?.clone();
            let sample = ds
                .get(index)
                .with_context(|| format!("failed to load sample {index}"))?;
            print!("{}", report::sample_report(index, &record, &sample));

            if let Some(dir) = save_dir {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                sample.input.save(dir.join("input.png"))?;
                sample.target.save(dir.join("target.png"))?;
                info!("Wrote sample images to {}", dir.display());
            }
        }
        Commands::Auc { experiment } => {
            let (exp, config) = experiment.split();
            let results = exp
                .evaluate_auc(&config)
                .with_context(|| format!("failed to score run {}", exp.name()))?;
            print!("{}", report::auc_table(&results));
        }
        Commands::Vis { experiment } => {
            let (exp, config) = experiment.split();
            let written = exp.visualize_pairs(&config)?;
            info!("Wrote {} composites to {}", written, exp.vis_dir().display());
        }
        Commands::VisAll {
            experiment,
            size,
            font,
        } => {
            let (exp, mut config) = experiment.split();
            if let Some(font) = font {
                config = config.font(font);
            }
            let results = exp.visualize_all(&config, size)?;
            print!("{}", report::auc_table(&results));
            info!(
                "Wrote {} heatmaps to {}",
                results.len(),
                exp.vis_all_dir().display()
            );
        }
    }

    Ok(())
}

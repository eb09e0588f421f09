//! Train the fare, trip-time and consumption models, report their quality on
//! the test set, and write predictions for both datasets.
//!
//! Usage: fareml --data-dir Data --model-dir models

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use fareml::data::TripDataset;
use fareml::io::{read_trips, save_model, write_predictions};
use fareml::pipeline::{BoostedTreeTrainer, Estimator, TaxiModels};
use fareml::tree::BoostingParams;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Taxi fare, trip time and consumption regression")]
struct Args {
    /// Directory holding the input CSV files
    #[arg(long, default_value = "Data")]
    data_dir: PathBuf,

    /// Training file name inside the data directory
    #[arg(long, default_value = "taxi-fare-train.csv")]
    train_file: String,

    /// Test file name inside the data directory
    #[arg(long, default_value = "taxi-fare-test.csv")]
    test_file: String,

    /// Where to write predictions for the training set
    #[arg(long, default_value = "train_predicted.csv")]
    train_output: PathBuf,

    /// Where to write predictions for the test set
    #[arg(long, default_value = "test_predicted.csv")]
    test_output: PathBuf,

    /// Seed for row subsampling
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Trees per model
    #[arg(long, default_value = "100")]
    n_estimators: usize,

    /// Shrinkage applied to each tree
    #[arg(long, default_value = "0.2")]
    learning_rate: f64,

    /// Leaves per tree
    #[arg(long, default_value = "20")]
    max_leaves: usize,

    /// Minimum rows per leaf
    #[arg(long, default_value = "10")]
    min_samples_leaf: usize,

    /// Save the fitted models as JSON into this directory
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

impl Args {
    fn boosting_params(&self) -> BoostingParams {
        BoostingParams {
            n_estimators: self.n_estimators,
            learning_rate: self.learning_rate,
            max_leaves: self.max_leaves,
            min_samples_leaf: self.min_samples_leaf,
            seed: self.seed,
            ..BoostingParams::default()
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fareml=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let stdout = io::stdout();
    run(&args, &mut stdout.lock())
}

fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let train = load(&args.data_dir.join(&args.train_file))?;
    let test = load(&args.data_dir.join(&args.test_file))?;

    let trainer = BoostedTreeTrainer::new(args.boosting_params());
    let models = TaxiModels::train(&trainer, train.trips()).context("failed to train models")?;

    let evaluation = models
        .evaluate(test.trips())
        .context("failed to evaluate models on the test set")?;
    for (label, m) in evaluation.by_label() {
        info!(label = %label, r2 = m.r2, rmse = m.rmse, mae = m.mae, mse = m.mse, "test metrics");
    }
    report::print_report(out, &evaluation)?;

    if let Some(dir) = &args.model_dir {
        save_models(&models, dir)?;
    }

    predict_and_write(&models, &train, &args.train_output)?;
    predict_and_write(&models, &test, &args.test_output)?;

    writeln!(out, "Prediction completed and files saved.")?;
    Ok(())
}

fn load(path: &Path) -> Result<TripDataset> {
    let dataset = read_trips(path).with_context(|| format!("failed to load {}", path.display()))?;
    info!(path = %path.display(), rows = dataset.len(), "loaded trips");
    Ok(dataset)
}

fn predict_and_write<E: Estimator>(
    models: &TaxiModels<E>,
    dataset: &TripDataset,
    path: &Path,
) -> Result<()> {
    let predictions = models
        .predict(dataset.trips())
        .with_context(|| format!("failed to predict rows for {}", path.display()))?;
    write_predictions(path, dataset.trips(), &predictions)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = predictions.len(), "wrote predictions");
    Ok(())
}

fn save_models<E: Estimator + Serialize>(models: &TaxiModels<E>, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for (stem, model) in models.named() {
        let path = dir.join(format!("{}.json", stem));
        save_model(model, &path).with_context(|| format!("failed to save {}", path.display()))?;
        info!(path = %path.display(), "saved model");
    }
    Ok(())
}

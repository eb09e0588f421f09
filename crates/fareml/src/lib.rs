//! # fareml
//!
//! Regression models for New York taxi trips: fare amount, trip duration and
//! fuel consumption, each trained independently on the same trip records.
//!
//! ## Modules
//!
//! - **core**: dense row-major tensors and the `Float` element trait
//! - **data**: `TaxiTrip` records, column identifiers, `TripDataset`
//! - **preprocessing**: label and one-hot encoding of categorical columns
//! - **tree**: histogram-binned regression trees and gradient boosting
//! - **metrics**: R², RMSE, MAE, MSE
//! - **io**: trip CSV loading, prediction CSV writing, JSON model files
//! - **pipeline**: feature pipelines, `Estimator`/`Trainer` traits, `TaxiModels`

/// Tensor engine.
pub use fareml_core as core;

/// Trip records and datasets.
pub use fareml_data as data;

/// Categorical encoding.
pub use fareml_preprocessing as preprocessing;

/// Tree-based models.
pub use fareml_tree as tree;

/// Evaluation metrics.
pub use fareml_metrics as metrics;

/// I/O utilities.
pub use fareml_io as io;

/// Training pipelines.
pub use fareml_pipeline as pipeline;

use fareml_core::{Float, Tensor, TensorError};
use fareml_core::error::TensorResult;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::binning::{BinnedMatrix, DEFAULT_MAX_BINS};
use crate::decision_tree::DecisionTreeRegressor;

/// Hyperparameters for [`GradientBoostingRegressor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    /// Number of boosting iterations (trees)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's output
    pub learning_rate: f64,
    /// Leaves per tree
    pub max_leaves: usize,
    /// Optional depth cap; `None` leaves depth bounded only by `max_leaves`
    pub max_depth: Option<usize>,
    /// Minimum rows in a node to consider splitting it
    pub min_samples_split: usize,
    /// Minimum rows in every leaf
    pub min_samples_leaf: usize,
    /// Histogram bins per feature
    pub max_bins: usize,
    /// Fraction of rows drawn for each tree
    pub subsample: f64,
    /// Seed for row subsampling
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.2,
            max_leaves: 20,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 10,
            max_bins: DEFAULT_MAX_BINS,
            subsample: 1.0,
            seed: 0,
        }
    }
}

/// Gradient Boosted Trees for Regression.
///
/// Uses gradient descent in function space by sequentially fitting
/// decision trees to the residuals (negative gradient of the squared loss).
/// Features are binned once per `fit`; every tree searches splits over
/// the same histograms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct GradientBoostingRegressor<T: Float> {
    pub params: BoostingParams,
    trees: Vec<DecisionTreeRegressor<T>>,
    initial_prediction: T,
}

impl<T: Float> GradientBoostingRegressor<T> {
    pub fn new(params: BoostingParams) -> Self {
        let mut params = params;
        params.subsample = params.subsample.max(0.1).min(1.0);
        params.max_bins = params.max_bins.clamp(2, 256);
        GradientBoostingRegressor {
            params,
            trees: Vec::new(),
            initial_prediction: T::ZERO,
        }
    }

    pub fn fit(&mut self, x: &Tensor<T>, y: &Tensor<T>) -> TensorResult<()> {
        let (n, _p) = x.shape().matrix_dims()?;
        if n == 0 {
            return Err(TensorError::Empty);
        }
        if y.numel() != n {
            return Err(TensorError::ShapeMismatch {
                expected: vec![n],
                got: y.shape_vec(),
            });
        }

        let binned = BinnedMatrix::from_tensor(x, self.params.max_bins)?;
        let targets: Vec<f64> = y.data().iter().map(|v| v.to_f64()).collect();

        // Initial prediction: mean of y
        let initial = targets.iter().sum::<f64>() / n as f64;
        self.initial_prediction = T::from_f64(initial);

        let mut predictions = vec![initial; n];
        let mut residuals = vec![0.0f64; n];
        let learning_rate = self.params.learning_rate;
        let sample_size = ((n as f64 * self.params.subsample).round() as usize).clamp(1, n);
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        self.trees.clear();

        for _iter in 0..self.params.n_estimators {
            for i in 0..n {
                residuals[i] = targets[i] - predictions[i];
            }

            let rows = if sample_size < n {
                let mut rows: Vec<usize> = (0..n).collect();
                rows.shuffle(&mut rng);
                rows.truncate(sample_size);
                rows.sort_unstable();
                rows
            } else {
                (0..n).collect()
            };

            let mut tree = DecisionTreeRegressor::new(
                self.params.max_depth.unwrap_or(usize::MAX),
                self.params.min_samples_split,
                self.params.min_samples_leaf,
            )
            .with_max_leaves(self.params.max_leaves);
            tree.fit_binned(&binned, &residuals, rows);

            for i in 0..n {
                predictions[i] += learning_rate * tree.predict_row(x.row(i)?)?.to_f64();
            }

            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predict a single feature row.
    pub fn predict_row(&self, row: &[T]) -> TensorResult<T> {
        if self.trees.is_empty() && self.params.n_estimators > 0 {
            return Err(TensorError::NotFitted);
        }
        let learning_rate = T::from_f64(self.params.learning_rate);
        let mut prediction = self.initial_prediction;
        for tree in &self.trees {
            prediction += learning_rate * tree.predict_row(row)?;
        }
        Ok(prediction)
    }

    pub fn predict(&self, x: &Tensor<T>) -> TensorResult<Tensor<T>> {
        let (n, _) = x.shape().matrix_dims()?;
        let mut predictions = Vec::with_capacity(n);
        for i in 0..n {
            predictions.push(self.predict_row(x.row(i)?)?);
        }
        Tensor::new(predictions, vec![n])
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl<T: Float> Default for GradientBoostingRegressor<T> {
    fn default() -> Self {
        Self::new(BoostingParams::default())
    }
}

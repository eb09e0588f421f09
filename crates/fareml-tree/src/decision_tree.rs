use fareml_core::{Float, Tensor, TensorError};
use fareml_core::error::TensorResult;
use serde::{Deserialize, Serialize};

use crate::binning::{BinnedMatrix, DEFAULT_MAX_BINS};

/// Splits must reduce squared error by more than this fraction of the
/// node's total sum of squares.
const MIN_GAIN_RATIO: f64 = 1e-12;

/// A node in the decision tree. Children are indices into the node arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
enum TreeNode<T: Float> {
    /// Internal node: rows with `x[feature_idx] <= threshold` go left.
    Split {
        feature_idx: usize,
        threshold: T,
        left: usize,
        right: usize,
    },
    /// Leaf: predicts a regression value.
    Leaf { value: T },
}

/// Best split found for one open leaf.
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    bin: usize,
    gain: f64,
}

/// A leaf that may still be split during best-first growth.
struct OpenLeaf {
    node: usize,
    rows: Vec<usize>,
    depth: usize,
    split: Option<SplitCandidate>,
}

/// Regression tree using CART's squared-error criterion over histogram bins.
///
/// Grows best-first: the open leaf with the largest gain is split next,
/// until `max_leaves` leaves exist or no split improves the fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct DecisionTreeRegressor<T: Float> {
    pub max_depth: usize,
    pub max_leaves: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Histogram bins per feature used by [`fit`](Self::fit)
    #[serde(default = "default_max_bins")]
    pub max_bins: usize,
    nodes: Vec<TreeNode<T>>,
}

fn default_max_bins() -> usize {
    DEFAULT_MAX_BINS
}

impl<T: Float> DecisionTreeRegressor<T> {
    pub fn new(max_depth: usize, min_samples_split: usize, min_samples_leaf: usize) -> Self {
        DecisionTreeRegressor {
            max_depth,
            max_leaves: usize::MAX,
            min_samples_split: min_samples_split.max(2),
            min_samples_leaf: min_samples_leaf.max(1),
            max_bins: DEFAULT_MAX_BINS,
            nodes: Vec::new(),
        }
    }

    pub fn with_max_leaves(mut self, max_leaves: usize) -> Self {
        self.max_leaves = max_leaves.max(1);
        self
    }

    pub fn with_max_bins(mut self, max_bins: usize) -> Self {
        self.max_bins = max_bins;
        self
    }

    /// Fit on a raw `[n, p]` matrix, binned with `max_bins` bins per feature.
    pub fn fit(&mut self, x: &Tensor<T>, y: &Tensor<T>) -> TensorResult<()> {
        let (n, _) = x.shape().matrix_dims()?;
        if y.numel() != n {
            return Err(TensorError::ShapeMismatch {
                expected: vec![n],
                got: y.shape_vec(),
            });
        }
        let binned = BinnedMatrix::from_tensor(x, self.max_bins)?;
        let targets: Vec<f64> = y.data().iter().map(|v| v.to_f64()).collect();
        self.fit_binned(&binned, &targets, (0..n).collect());
        Ok(())
    }

    /// Fit on the given `rows` of an already binned matrix.
    pub fn fit_binned(&mut self, binned: &BinnedMatrix<T>, targets: &[f64], rows: Vec<usize>) {
        self.nodes.clear();
        self.nodes.push(TreeNode::Leaf {
            value: T::from_f64(mean(targets, &rows)),
        });

        let split = self.best_split(binned, targets, &rows, 0);
        let mut open = vec![OpenLeaf {
            node: 0,
            rows,
            depth: 0,
            split,
        }];
        let mut n_leaves = 1;

        while n_leaves < self.max_leaves {
            let mut best: Option<(usize, f64)> = None;
            for (i, leaf) in open.iter().enumerate() {
                if let Some(s) = leaf.split {
                    if best.map_or(true, |(_, g)| s.gain > g) {
                        best = Some((i, s.gain));
                    }
                }
            }
            let Some((i, _)) = best else { break };

            let leaf = open.remove(i);
            let Some(split) = leaf.split else { break };
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = leaf
                .rows
                .into_iter()
                .partition(|&r| binned.bin(r, split.feature_idx) <= split.bin);

            let left = self.nodes.len();
            self.nodes.push(TreeNode::Leaf {
                value: T::from_f64(mean(targets, &left_rows)),
            });
            let right = self.nodes.len();
            self.nodes.push(TreeNode::Leaf {
                value: T::from_f64(mean(targets, &right_rows)),
            });
            self.nodes[leaf.node] = TreeNode::Split {
                feature_idx: split.feature_idx,
                threshold: binned.threshold(split.feature_idx, split.bin),
                left,
                right,
            };
            n_leaves += 1;

            let depth = leaf.depth + 1;
            for (node, rows) in [(left, left_rows), (right, right_rows)] {
                let split = self.best_split(binned, targets, &rows, depth);
                open.push(OpenLeaf {
                    node,
                    rows,
                    depth,
                    split,
                });
            }
        }
    }

    fn best_split(
        &self,
        binned: &BinnedMatrix<T>,
        targets: &[f64],
        rows: &[usize],
        depth: usize,
    ) -> Option<SplitCandidate> {
        let n = rows.len();
        if depth >= self.max_depth
            || n < self.min_samples_split
            || n < 2 * self.min_samples_leaf
        {
            return None;
        }

        let total_sum: f64 = rows.iter().map(|&r| targets[r]).sum();
        let total_sq: f64 = rows.iter().map(|&r| targets[r] * targets[r]).sum();
        let parent_score = total_sum * total_sum / n as f64;
        let mut best_gain = MIN_GAIN_RATIO * total_sq;
        let mut best = None;

        let mut sums = Vec::new();
        let mut counts = Vec::new();
        for feature in 0..binned.n_features() {
            let n_bins = binned.n_bins(feature);
            if n_bins < 2 {
                continue;
            }
            sums.clear();
            sums.resize(n_bins, 0.0f64);
            counts.clear();
            counts.resize(n_bins, 0usize);
            for &r in rows {
                let b = binned.bin(r, feature);
                sums[b] += targets[r];
                counts[b] += 1;
            }

            let mut left_sum = 0.0;
            let mut left_n = 0usize;
            for b in 0..n_bins - 1 {
                left_sum += sums[b];
                left_n += counts[b];
                if counts[b] == 0 || left_n < self.min_samples_leaf {
                    continue;
                }
                let right_n = n - left_n;
                if right_n < self.min_samples_leaf {
                    break;
                }
                let right_sum = total_sum - left_sum;
                let gain = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64
                    - parent_score;
                if gain > best_gain {
                    best_gain = gain;
                    best = Some(SplitCandidate {
                        feature_idx: feature,
                        bin: b,
                        gain,
                    });
                }
            }
        }
        best
    }

    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// Predict a single feature row.
    pub fn predict_row(&self, row: &[T]) -> TensorResult<T> {
        if self.nodes.is_empty() {
            return Err(TensorError::NotFitted);
        }
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split { feature_idx, threshold, left, right } => {
                    let v = row.get(*feature_idx).copied().ok_or(TensorError::FeatureOutOfBounds {
                        index: *feature_idx,
                        width: row.len(),
                    })?;
                    idx = if v <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn predict(&self, x: &Tensor<T>) -> TensorResult<Tensor<T>> {
        let (n, _) = x.shape().matrix_dims()?;
        let mut preds = Vec::with_capacity(n);
        for i in 0..n {
            preds.push(self.predict_row(x.row(i)?)?);
        }
        Tensor::new(preds, vec![n])
    }
}

fn mean(targets: &[f64], rows: &[usize]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|&r| targets[r]).sum::<f64>() / rows.len() as f64
}

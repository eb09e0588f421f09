use fareml_core::{Float, Tensor, TensorError};
use fareml_core::error::TensorResult;

/// Default number of histogram bins per feature.
pub const DEFAULT_MAX_BINS: usize = 255;

/// Feature matrix quantised into per-feature histogram bins.
///
/// Bin `b` of feature `f` holds every value `v` with
/// `edges[f][b - 1] < v <= edges[f][b]`; the last bin is open above.
/// Values that are not finite land in the last bin, which matches
/// `v <= threshold` being false for them at prediction time.
#[derive(Debug, Clone)]
pub struct BinnedMatrix<T: Float> {
    n_rows: usize,
    n_features: usize,
    bins: Vec<u8>,
    edges: Vec<Vec<T>>,
}

impl<T: Float> BinnedMatrix<T> {
    /// Quantise an `[n, p]` matrix using at most `max_bins` bins per feature.
    pub fn from_tensor(x: &Tensor<T>, max_bins: usize) -> TensorResult<Self> {
        let (n_rows, n_features) = x.shape().matrix_dims()?;
        if !(2..=256).contains(&max_bins) {
            return Err(TensorError::InvalidParameter(format!(
                "max_bins must be in 2..=256, got {}",
                max_bins
            )));
        }

        let data = x.data();
        let mut edges = Vec::with_capacity(n_features);
        for f in 0..n_features {
            let mut column: Vec<T> = (0..n_rows).map(|i| data[i * n_features + f]).collect();
            edges.push(bin_edges(&mut column, max_bins));
        }

        let mut bins = vec![0u8; n_rows * n_features];
        for i in 0..n_rows {
            for f in 0..n_features {
                bins[i * n_features + f] = bin_of(&edges[f], data[i * n_features + f]) as u8;
            }
        }

        Ok(BinnedMatrix {
            n_rows,
            n_features,
            bins,
            edges,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of bins in use for `feature`.
    pub fn n_bins(&self, feature: usize) -> usize {
        self.edges[feature].len() + 1
    }

    #[inline]
    pub fn bin(&self, row: usize, feature: usize) -> usize {
        self.bins[row * self.n_features + feature] as usize
    }

    /// Raw-value threshold separating bins `..=bin` from `bin + 1..`.
    pub fn threshold(&self, feature: usize, bin: usize) -> T {
        self.edges[feature][bin]
    }
}

fn bin_of<T: Float>(edges: &[T], value: T) -> usize {
    edges.partition_point(|&e| !(value <= e))
}

/// Upper edges for one feature column; `column` is consumed as scratch space.
fn bin_edges<T: Float>(column: &mut Vec<T>, max_bins: usize) -> Vec<T> {
    column.retain(|v| v.is_finite());
    column.sort_by(|a, b| a.to_f64().total_cmp(&b.to_f64()));

    let mut distinct = column.clone();
    distinct.dedup();
    if distinct.len() <= max_bins {
        return distinct.windows(2).map(|w| (w[0] + w[1]) / T::TWO).collect();
    }

    // Too many distinct values: cut at evenly spaced quantiles.
    let n = column.len();
    let mut edges: Vec<T> = Vec::with_capacity(max_bins - 1);
    for k in 1..max_bins {
        let pos = k * n / max_bins;
        let (lo, hi) = (column[pos - 1], column[pos]);
        if lo < hi {
            let edge = (lo + hi) / T::TWO;
            if edges.last().map_or(true, |&last| edge > last) {
                edges.push(edge);
            }
        }
    }
    edges
}
